//! # Demo: stock_ticker
//!
//! Two exchange feeds (tokio tasks) publish price updates onto a [`Bus`]. A single
//! [`Relay`] forwards them into a [`SharedHub`] where a trader display (closure),
//! an alert system and a [`LogWriter`] receive every update in the same order.
//!
//! ## Flow
//! ```text
//! feed "NYSE"   ──┐
//!                 ├──► Bus ──► Relay ──► SharedHub ──► trader display (SubscriberFn)
//! feed "NASDAQ" ──┘                                ├─► alert system
//!                                                  └─► LogWriter (tracing)
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! RUST_LOG=info cargo run --example stock_ticker --features logging
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use notifyhub::{
    Bus, LogWriter, Relay, RelayConfig, SharedHub, SignalError, Subscribe, SubscriberError,
    SubscriberFn,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct StockPrice {
    name: &'static str,
    price: f64,
    time: DateTime<Local>,
}

#[derive(Debug)]
struct FeedError(&'static str);

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed {} disconnected", self.0)
    }
}

impl std::error::Error for FeedError {}

/// Raises an alert when a price crosses its threshold.
struct AlertSystem {
    threshold: f64,
    raised: Mutex<Vec<String>>,
}

impl Subscribe<StockPrice> for AlertSystem {
    fn on_next(&self, stock: &StockPrice) -> Result<(), SubscriberError> {
        if !stock.price.is_finite() {
            return Err(SubscriberError::from(format!(
                "invalid price for {}",
                stock.name
            )));
        }
        if stock.price >= self.threshold {
            let alert = format!("{} at {:.2} >= {:.2}", stock.name, stock.price, self.threshold);
            println!("ALERT: {alert}");
            self.raised.lock().push(alert);
        }
        Ok(())
    }

    fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
        println!("ALERT: market data problem: {error}");
        Ok(())
    }

    fn on_completed(&self) -> Result<(), SubscriberError> {
        println!("Alert system: {} alert(s) today", self.raised.lock().len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "alert-system"
    }
}

fn feed(bus: Bus<StockPrice>, name: &'static str, prices: Vec<f64>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for price in prices {
            bus.publish_next(StockPrice {
                name,
                price,
                time: Local::now(),
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let market = SharedHub::<StockPrice>::new();
    let bus = Bus::<StockPrice>::new(256);

    let _trader = market.subscribe(SubscriberFn::arc("trader-display", |stock: &StockPrice| {
        println!(
            "Trader sees {}: {:.2} ({})",
            stock.name,
            stock.price,
            stock.time.format("%H:%M:%S%.3f")
        );
    }));
    let alerts = Arc::new(AlertSystem {
        threshold: 2000.0,
        raised: Mutex::new(Vec::new()),
    });
    let _alerts = market.subscribe(alerts.clone());
    let _logger = market.subscribe(Arc::new(LogWriter::new("ticker-log")));

    let relay = Relay::new(market.clone(), RelayConfig::default())
        .spawn(bus.subscribe(), CancellationToken::new());

    let nyse = feed(bus.clone(), "ACME", vec![1990.0, 2005.5, 1999.0]);
    let nasdaq = feed(bus.clone(), "GLOBEX", vec![310.25, f64::NAN, 2100.0]);
    nyse.await?;
    nasdaq.await?;

    bus.publish_error(FeedError("GLOBEX"));
    bus.publish_completed();

    let stats = relay.await?;
    println!(
        "relayed={} lagged={} subscriber failures={}",
        stats.relayed, stats.lagged, stats.failures
    );
    Ok(())
}
