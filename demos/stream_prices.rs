use tradefeed_rs::types::PriceQuote;
use tradefeed_rs::{event, FeedConfig, FeedSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = FeedSession::new(FeedConfig::from_env()?);

    session.on(event::CONNECTION_STATUS, |evt| {
        println!("status -> {}", evt.data);
    });

    session.on(event::PRICE_UPDATE, |evt| {
        let symbol = evt.symbol.clone().unwrap_or_default();
        match evt.decode::<PriceQuote>() {
            Ok(quote) => println!(
                "[{}] bid {} / ask {} (spread {}, vol {})",
                symbol, quote.bid, quote.ask, quote.spread, quote.volume
            ),
            Err(_) => println!("[{}] {}", symbol, evt.data),
        }
    });

    session.on(event::CONNECTION_FAILED, |evt| {
        eprintln!("feed lost: {}", evt.data["reason"]);
    });

    println!("Connecting to feed...");
    session.connect().await?;

    for symbol in ["EURUSD", "GBPUSD", "XAUUSD"] {
        session.subscribe(symbol).await?;
        println!("Subscribed to {}", symbol);
    }

    println!("Streaming prices; press Ctrl+C to stop.\n");
    tokio::signal::ctrl_c().await?;

    session.disconnect().await;
    Ok(())
}
