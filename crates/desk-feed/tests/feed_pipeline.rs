//! End-to-end feed pipeline: raw SSE bytes -> typed events -> latest-value
//! store -> classified buckets.

use desk_core::{CfdState, Price};
use desk_feed::{classify, EventParser, FeedState, SseDecoder};
use rust_decimal_macros::dec;

const CFDS_FRAME: &str = concat!(
    "event: cfds\n",
    "data: [",
    r#"{"order_id":"9e6e19fd-deac-4ac3-a59a-49c1a9c4f8d6","trading_pair":"BTC/USD","position":"Sell","initial_price":"42000","quantity_usd":"100","leverage":2,"liquidation_price":"21000","state":"Requested","state_transition_timestamp":"2024-01-01T00:00:00Z"},"#,
    r#"{"order_id":"52cf0e4e-9c22-45d3-b1d4-e6fd4df8f5b7","trading_pair":"BTC/USD","position":"Sell","initial_price":"42000","quantity_usd":"200","leverage":2,"liquidation_price":"21000","state":"Accepted","state_transition_timestamp":"2024-01-01T00:00:00Z"},"#,
    r#"{"order_id":"0dce4e62-03f9-49d9-8b06-3d0db5cbe572","trading_pair":"BTC/USD","position":"Sell","initial_price":"42000","quantity_usd":"300","leverage":2,"liquidation_price":"21000","state":"Bogus","state_transition_timestamp":"2024-01-01T00:00:00Z"}"#,
    "]\n\n",
);

const QUOTE_FRAME: &str =
    "event: quote\ndata: {\"bid\":\"41990\",\"ask\":\"42010\",\"last_updated_at\":\"2024-01-01T00:00:00Z\"}\n\n";

fn run_pipeline(stream: &[u8], chunk_size: usize) -> FeedState {
    let mut decoder = SseDecoder::new();
    let parser = EventParser::new();
    let state = FeedState::new();

    for chunk in stream.chunks(chunk_size) {
        for frame in decoder.feed(chunk).unwrap() {
            if let Some(event) = parser.parse(&frame.event, &frame.data).unwrap() {
                state.apply(event);
            }
        }
    }

    state
}

#[test]
fn pipeline_classifies_snapshot_from_raw_bytes() {
    let mut stream = String::new();
    stream.push_str(": keep-alive\n\n");
    stream.push_str(QUOTE_FRAME);
    stream.push_str(CFDS_FRAME);

    // Tiny chunks exercise frame reassembly across boundaries.
    let state = run_pipeline(stream.as_bytes(), 7);

    assert_eq!(state.quote().unwrap().bid, Price::new(dec!(41990)));

    let snapshot = state.cfds().unwrap();
    let buckets = classify(&snapshot);
    assert_eq!(buckets.open.len(), 1);
    assert_eq!(buckets.running.len(), 1);
    assert!(buckets.closed.is_empty());
    assert_eq!(buckets.unsorted.len(), 1);
    assert_eq!(
        buckets.unsorted[0].state,
        CfdState::Unknown("Bogus".to_string())
    );
    assert_eq!(buckets.total(), snapshot.len());
}

#[test]
fn pipeline_latest_snapshot_wins() {
    let mut stream = String::new();
    stream.push_str(CFDS_FRAME);
    stream.push_str("event: cfds\ndata: []\n\n");

    let state = run_pipeline(stream.as_bytes(), 16);

    assert_eq!(state.cfds_seq(), 2);
    assert!(state.cfds().unwrap().is_empty());
    assert!(classify(&state.cfds().unwrap()).is_empty());
}

#[test]
fn pipeline_skips_unknown_channels() {
    let stream = b"event: heartbeat\ndata: {}\n\n";
    let state = run_pipeline(stream, 5);

    assert_eq!(state.cfds_seq(), 0);
    assert!(state.quote().is_none());
}
