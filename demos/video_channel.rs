//! # Demo: video_channel
//!
//! A channel (publisher) uploads videos; viewers (subscribers) get notified.
//! One viewer unsubscribes halfway and misses the second upload. Ending the
//! channel sends `completed` and drops every remaining subscriber.
//!
//! ## Flow
//! ```text
//! subscribe(rahul, priya, amit)
//!   ├─► upload("Part 1")   ─► rahul, priya, amit
//!   ├─► rahul.cancel()
//!   ├─► upload("Part 2")   ─► priya, amit
//!   └─► end()              ─► completed ─► subscriber list cleared
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example video_channel
//! ```

use std::rc::Rc;

use notifyhub::{
    HubConfig, HubError, NotificationHub, SignalError, Subscribe, SubscriberError, Subscription,
};
use tracing_subscriber::EnvFilter;

struct Viewer {
    name: &'static str,
}

impl Subscribe<String> for Viewer {
    fn on_next(&self, title: &String) -> Result<(), SubscriberError> {
        println!("   🔔 {} received notification: New video - {title}", self.name);
        Ok(())
    }

    fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
        println!("   ⚠️ {}: Error occurred - {error}", self.name);
        Ok(())
    }

    fn on_completed(&self) -> Result<(), SubscriberError> {
        println!("   ✋ {}: Channel has ended. No more videos.", self.name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

struct VideoChannel {
    name: &'static str,
    hub: NotificationHub<String>,
}

impl VideoChannel {
    fn new(name: &'static str) -> Self {
        let config = HubConfig {
            clear_on_complete: true,
            ..HubConfig::default()
        };
        Self {
            name,
            hub: NotificationHub::with_config(config),
        }
    }

    fn subscribe(&self, viewer: Rc<Viewer>) -> Subscription<String> {
        let already = self.hub.contains(&viewer);
        let handle = self.hub.subscribe(viewer);
        if !already {
            println!("✅ Subscribed to {}", self.name);
        }
        handle
    }

    fn upload(&self, title: &str) -> Result<(), HubError> {
        println!("\n📹 New Video Uploaded: \"{title}\"\n");
        let delivery = self.hub.publish_next(title.to_string())?;
        tracing::info!(recipients = delivery.recipients, "upload announced");
        Ok(())
    }

    fn end(&self) -> Result<(), HubError> {
        self.hub.publish_completed()?;
        Ok(())
    }
}

fn unsubscribe(handle: &Subscription<String>) {
    if handle.cancel() {
        println!("❌ Unsubscribed successfully!");
    }
}

fn main() -> Result<(), HubError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Video Channel Example ===\n");

    let channel = VideoChannel::new("Kartik's Coding Channel");
    let rahul = Rc::new(Viewer { name: "Rahul" });
    let priya = Rc::new(Viewer { name: "Priya" });
    let amit = Rc::new(Viewer { name: "Amit" });

    println!("--- Subscribing ---");
    let rahul_sub = channel.subscribe(rahul);
    let _priya_sub = channel.subscribe(priya);
    let _amit_sub = channel.subscribe(amit);

    println!("\n--- Uploading First Video ---");
    channel.upload("Rust Tutorial Part 1")?;

    println!("\n--- Rahul Unsubscribes ---");
    unsubscribe(&rahul_sub);
    // Second cancel is a no-op.
    unsubscribe(&rahul_sub);

    println!("\n--- Uploading Second Video ---");
    channel.upload("Rust Tutorial Part 2")?;

    println!("\n--- Channel Ends (completed) ---");
    channel.end()?;

    println!("\n=== Notice: Rahul didn't get the second video notification! ===");
    Ok(())
}
