mod api;
mod app;
mod config;
mod error;
mod filter;
mod push;
mod store;
#[cfg(test)]
mod testutil;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use api::payloads::ItemDraft;
use api::types::{ItemKind, ItemStatus};
use api::{Gateway, InventoryClient};
use filter::FilterSet;
use store::InventoryStore;

#[derive(Parser, Debug)]
#[command(name = "stockwatch")]
#[command(about = "A live terminal client for inventory stock")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/stockwatch/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Server URL, overriding the config file
  #[arg(short, long)]
  server: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Follow the filtered item list, re-rendering on every server push
  Watch {
    #[command(flatten)]
    filters: FilterArgs,
    /// Rows per page
    #[arg(long)]
    page_size: Option<u32>,
  },
  /// Print one page of the item list
  List {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Rows per page
    #[arg(long)]
    page_size: Option<u32>,
  },
  /// Adjust the quantity of a consumable item
  Adjust {
    id: String,
    /// Signed change, e.g. -2 or 10
    #[arg(allow_hyphen_values = true)]
    delta: f64,
    /// Free-form note recorded with the adjustment
    #[arg(long)]
    note: Option<String>,
  },
  /// Change an item's lifecycle status
  Status {
    id: String,
    status: ItemStatus,
    /// Required by the server when the status is loaned
    #[arg(long)]
    assignee: Option<String>,
  },
  /// Move an item into a container or under a parent item
  Move {
    id: String,
    #[arg(long)]
    container: Option<String>,
    #[arg(long)]
    parent: Option<String>,
  },
  /// Create an item
  Create {
    #[arg(long)]
    name: String,
    /// consumable or asset
    #[arg(long, default_value = "consumable")]
    kind: ItemKind,
    #[arg(long)]
    category: String,
    #[arg(long, default_value_t = 0.0)]
    quantity: f64,
    #[arg(long, default_value = "pcs")]
    unit: String,
    #[arg(long)]
    min_stock: Option<f64>,
    #[arg(long)]
    container: Option<String>,
  },
  /// Delete an item
  Delete { id: String },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
  /// consumable or asset
  #[arg(long)]
  kind: Option<ItemKind>,
  #[arg(long)]
  category: Option<String>,
  #[arg(long)]
  status: Option<ItemStatus>,
  #[arg(long)]
  container: Option<String>,
  #[arg(long)]
  search: Option<String>,
  /// Only items at or below their minimum stock
  #[arg(long)]
  low_stock: bool,
}

impl FilterArgs {
  fn into_filters(self) -> FilterSet {
    FilterSet {
      kind: self.kind,
      category: self.category,
      status: self.status,
      container_id: self.container,
      search: self.search,
      low_stock: self.low_stock,
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockwatch=info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load configuration, or build one from the command line override
  let config = match &args.server {
    Some(url) => config::Config::from_server_url(url.clone()),
    None => config::Config::load(args.config.as_deref())?,
  };
  let server = config.server_url()?;
  let token = config::Config::get_api_token()?;
  let client = InventoryClient::new(server.clone(), token);

  match args.command {
    Command::Watch { filters, page_size } => {
      let page_size = page_size
        .or(config.page_size)
        .unwrap_or(store::DEFAULT_PAGE_SIZE);
      let store = Arc::new(
        InventoryStore::new(client)
          .with_page_size(page_size)
          .with_filters(filters.into_filters()),
      );
      app::run_watch(store, &server).await?;
    }
    Command::List {
      filters,
      page,
      page_size,
    } => {
      let page_size = page_size
        .or(config.page_size)
        .unwrap_or(store::DEFAULT_PAGE_SIZE);
      let store = InventoryStore::new(client)
        .with_page_size(page_size)
        .with_page(page)
        .with_filters(filters.into_filters());
      store.fetch().await?;
      app::render(&store.snapshot());
    }
    Command::Adjust { id, delta, note } => {
      let item = client.adjust_quantity(&id, delta, note.as_deref()).await?;
      app::print_item(&item);
    }
    Command::Status {
      id,
      status,
      assignee,
    } => {
      let item = client.change_status(&id, status, assignee.as_deref()).await?;
      app::print_item(&item);
    }
    Command::Move {
      id,
      container,
      parent,
    } => {
      let item = client
        .move_item(&id, container.as_deref(), parent.as_deref())
        .await?;
      app::print_item(&item);
    }
    Command::Create {
      name,
      kind,
      category,
      quantity,
      unit,
      min_stock,
      container,
    } => {
      let draft = ItemDraft {
        kind,
        name,
        sku: None,
        category,
        container_id: container,
        quantity,
        unit,
        min_stock,
        unit_price: None,
        barcode: None,
        attributes: Default::default(),
      };
      let item = client.create_item(&draft).await?;
      app::print_item(&item);
    }
    Command::Delete { id } => {
      client.delete_item(&id).await?;
      println!("deleted {id}");
    }
  }

  Ok(())
}
