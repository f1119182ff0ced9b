/*
[INPUT]:  DRITAN_API_KEY environment variable
[OUTPUT]: Live pumpamm pool messages for a few seconds
[POS]:    Examples - WebSocket stream handling
[UPDATE]: When WebSocket API changes
*/

use dritan_sdk::*;
use tokio::time::{Duration, sleep};

/// Example: print DEX stream messages for ten seconds, then close
#[tokio::main]
async fn main() {
    println!("=== Dritan WebSocket Example ===\n");

    let api_key = match std::env::var("DRITAN_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Set DRITAN_API_KEY to run this example");
            return;
        }
    };

    let client = match DritanClient::new(api_key) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    let options = StreamOptions::new()
        .on_open(|| println!("✓ Stream open"))
        .on_message(|payload| match payload.decode::<DexStreamEnvelope>() {
            Ok(envelope) => println!("  {} message", envelope.message_type),
            Err(_) => println!("  {:?}", payload),
        })
        .on_error(|e| println!("✗ Stream error: {}", e))
        .on_close(|info| println!("Stream closed: {:?}", info));

    let stream = match client.stream_dex(KnownDexStream::PumpAmm, options) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Failed to open stream: {}", e);
            return;
        }
    };

    sleep(Duration::from_secs(10)).await;
    stream.close();
    stream.join().await;

    println!("\n✓ WebSocket example complete");
}
