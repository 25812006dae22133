//! Watch mode and plain-text rendering.
//!
//! The watch loop is the only long-lived consumer of the store: it renders
//! a snapshot on startup and re-renders whenever the store broadcasts a
//! change, whether that change came from a local mutation or from the push
//! channel.

use std::sync::Arc;

use color_eyre::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use url::Url;

use crate::api::types::Item;
use crate::api::InventoryClient;
use crate::push::PushChannel;
use crate::store::{InventoryStore, Snapshot};

/// Follow the filtered item list until interrupted.
pub async fn run_watch(store: Arc<InventoryStore<InventoryClient>>, server: &Url) -> Result<()> {
  store.fetch().await?;
  if let Err(err) = store.fetch_containers().await {
    warn!(%err, "container list unavailable");
  }
  render(&store.snapshot());

  let push = PushChannel::new(Arc::clone(&store), server)?;
  tokio::spawn(push.run());

  let mut events = store.subscribe();
  loop {
    tokio::select! {
      _ = tokio::signal::ctrl_c() => break,
      event = events.recv() => match event {
        Ok(_) => render(&store.snapshot()),
        Err(RecvError::Lagged(skipped)) => {
          warn!(skipped, "store event feed lagged");
          render(&store.snapshot());
        }
        Err(RecvError::Closed) => break,
      },
    }
  }

  Ok(())
}

/// Print one page as a table with a pagination footer.
pub fn render(snapshot: &Snapshot) {
  println!();
  println!(
    "{:<10} {:<28} {:<11} {:>10} {:<6} {:<11} {}",
    "ID", "NAME", "KIND", "QTY", "UNIT", "STATUS", "CATEGORY"
  );
  for item in &snapshot.items {
    let low = if item.low_stock() { "  LOW" } else { "" };
    println!(
      "{:<10} {:<28} {:<11} {:>10} {:<6} {:<11} {}{}",
      truncate(&item.id, 10),
      truncate(&item.name, 28),
      item.kind,
      fmt_qty(item.quantity),
      truncate(&item.unit, 6),
      item.status,
      item.category,
      low,
    );
  }
  let pages = page_count(snapshot.total, snapshot.page_size);
  let loading = if snapshot.loading { ", loading" } else { "" };
  println!(
    "page {} of {} ({} items{})",
    snapshot.page, pages, snapshot.total, loading
  );
}

/// One-line summary of a single item, for mutation subcommands.
pub fn print_item(item: &Item) {
  println!(
    "{}  {}  {} {}  {}",
    item.id,
    item.name,
    fmt_qty(item.quantity),
    item.unit,
    item.status
  );
}

/// Format a quantity without trailing zeros: 3.500 -> "3.5", 4.000 -> "4".
pub fn fmt_qty(quantity: f64) -> String {
  let s = format!("{quantity:.3}");
  s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn page_count(total: u64, page_size: u32) -> u64 {
  (total.max(1) as f64 / page_size.max(1) as f64).ceil() as u64
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
  }
}
