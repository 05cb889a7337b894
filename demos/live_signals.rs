use tradefeed_rs::types::{SignalUpdate, TradingSignal};
use tradefeed_rs::{event, FeedConfig, FeedSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = FeedSession::new(FeedConfig::from_env()?);

    session.on(event::REALTIME_SIGNAL, |evt| {
        match evt.decode::<TradingSignal>() {
            Ok(signal) => println!(
                "NEW {:?} {} @ {} (confidence {:.0}%)",
                signal.side,
                signal.symbol,
                signal.entry_price,
                signal.confidence * 100.0
            ),
            Err(_) => println!("signal: {}", evt.data),
        }
    });

    session.on(event::TRADING_SIGNALS, |evt| {
        match evt.decode::<Vec<TradingSignal>>() {
            Ok(signals) => {
                println!("--- {} current signals ---", signals.len());
                for signal in signals {
                    println!(
                        "  {:?} {} @ {} (tp {}, sl {})",
                        signal.side,
                        signal.symbol,
                        signal.entry_price,
                        signal.take_profit,
                        signal.stop_loss
                    );
                }
            }
            Err(_) => println!("signals: {}", evt.data),
        }
    });

    session.on(event::SIGNAL_UPDATE, |evt| {
        if let Ok(update) = evt.decode::<SignalUpdate>() {
            println!("signal {} is now {}", update.signal_id, update.status);
        }
    });

    // frame types this demo doesn't render
    session.set_unhandled_hook(|kind, _| {
        println!("(ignoring '{}' frame)", kind);
    });

    println!("Connecting to feed...");
    session.connect().await?;
    session.request_signals().await?;

    println!("Watching signals; press Ctrl+C to stop.\n");
    tokio::signal::ctrl_c().await?;

    session.disconnect().await;
    Ok(())
}
