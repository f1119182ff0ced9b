/*
[INPUT]:  DRITAN_API_KEY environment variable, token mint and wallet address
[OUTPUT]: Token price, risk, wallet summary and THS score printed to stdout
[POS]:    Examples - REST queries
[UPDATE]: When adding new REST endpoints
*/

use dritan_sdk::*;

/// Example: query token and wallet data
///
/// Requires DRITAN_API_KEY. The THS client is unauthenticated.
#[tokio::main]
async fn main() {
    println!("=== Dritan Market Data Example ===\n");

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
    println!("✓ Client created for {}\n", client.base_url());

    // wrapped SOL
    let mint = "So11111111111111111111111111111111111111112";

    match client.get_token_price(mint).await {
        Ok(price) => println!("✓ Price: ${} on {}", price.price_usd, price.dex),
        Err(e) => println!("✗ Price error: {}", e),
    }

    match client.get_token_risk(mint).await {
        Ok(risk) => println!("✓ Risk: {:?}", risk),
        Err(e) => println!("✗ Risk error: {}", e),
    }

    let options = TokenSearchOptions {
        limit: Some(5),
        ..Default::default()
    };
    match client.search_tokens("bonk", &options).await {
        Ok(search) => println!("✓ Search returned {} results", search.results().len()),
        Err(e) => println!("✗ Search error: {}", e),
    }

    let wallet = "5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1";
    match client.get_basic_wallet_information(wallet).await {
        Ok(summary) => println!("✓ Wallet summary: {:?}", summary),
        Err(e) => println!("✗ Wallet error: {}", e),
    }

    match ThsClient::new() {
        Ok(ths) => match ths.get_ths_score(wallet, &ThsOptions::default()).await {
            Ok(score) => println!("✓ THS score: {:.2}", score.score),
            Err(e) => println!("✗ THS error: {}", e),
        },
        Err(e) => println!("✗ THS client error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
