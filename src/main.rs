//! Furrow console entrypoint
//!
//! Thin chrome over the pipeline: parses configuration, loads the
//! stakeholder directory (falling back to the built-in set when the backend
//! is unreachable), then maps line commands onto router navigations and
//! action handlers, printing each section's rendered markup.

use clap::Parser;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use furrow::{
    actions::{ActionHandlers, QualityCheckForm, RegisterForm, TransferForm},
    config::Args,
    gateway::{HttpGateway, SupplyChainApi},
    model::StakeholderDirectory,
    notify::Notifier,
    router::{Section, ViewRouter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("furrow={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Furrow - Supply Chain Console");
    info!("======================================");
    info!("API base: {}", args.api_base());
    info!("======================================");

    let gateway: Arc<dyn SupplyChainApi> = Arc::new(HttpGateway::new(args.api_base()));

    // Load the stakeholder directory once; the built-in set keeps name
    // resolution working when the backend is down at startup
    let directory = match gateway.stakeholders().await {
        Ok(map) => {
            info!("Stakeholder directory loaded ({} entries)", map.len());
            Arc::new(StakeholderDirectory::from_map(map))
        }
        Err(e) => {
            warn!("Stakeholder directory unavailable, using built-in set: {}", e);
            Arc::new(StakeholderDirectory::builtin())
        }
    };

    let notifier = Notifier::new(Duration::from_millis(args.notify_dismiss_ms));
    let mut router = ViewRouter::new(Arc::clone(&gateway), directory, notifier.clone());
    let mut handlers = ActionHandlers::new(Arc::clone(&gateway), notifier.clone());

    router.navigate(Section::Dashboard).await;
    print_section(&router);

    println!("Type 'help' for commands.");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => continue,
        };
        let rest: Vec<&str> = parts.collect();

        match command {
            "dashboard" => router.navigate(Section::Dashboard).await,
            "products" => router.navigate(Section::Products).await,
            "analytics" => router.navigate(Section::Analytics).await,
            "register" => router.navigate(Section::Register).await,
            "track" => match rest.first() {
                Some(id) => router.track(id).await,
                None => router.navigate(Section::Track).await,
            },
            "analyze" => {
                router.navigate(Section::Analytics).await;
                router.analyze(rest.first().unwrap_or(&"")).await;
            }
            "verify" => handlers.verify(rest.first().unwrap_or(&"")).await,
            "new" => {
                // new <name>|<origin>|<harvest_date>|<quality>[|farmer_id]
                let joined = rest.join(" ");
                let fields: Vec<&str> = joined.split('|').map(str::trim).collect();
                let form = RegisterForm {
                    name: fields.first().unwrap_or(&"").to_string(),
                    origin: fields.get(1).unwrap_or(&"").to_string(),
                    harvest_date: fields.get(2).unwrap_or(&"").to_string(),
                    quality: fields.get(3).unwrap_or(&"").to_string(),
                    farmer_id: fields.get(4).unwrap_or(&"").to_string(),
                };
                handlers.register.open_modal();
                handlers.submit_register(&mut router, &form).await;
            }
            "transfer" => {
                // transfer <id> <from> <to> <price> [quality note...]
                let form = TransferForm {
                    product_id: rest.first().unwrap_or(&"").to_string(),
                    from_address: rest.get(1).unwrap_or(&"").to_string(),
                    to_address: rest.get(2).unwrap_or(&"").to_string(),
                    price: rest.get(3).unwrap_or(&"").to_string(),
                    quality_update: rest.get(4..).map(|r| r.join(" ")).unwrap_or_default(),
                };
                handlers.transfer.open_modal();
                handlers.submit_transfer(&mut router, &form).await;
            }
            "check" => {
                // check <id> <checked_by> <note...>
                let form = QualityCheckForm {
                    product_id: rest.first().unwrap_or(&"").to_string(),
                    checked_by: rest.get(1).unwrap_or(&"").to_string(),
                    quality_note: rest.get(2..).map(|r| r.join(" ")).unwrap_or_default(),
                    temperature: String::new(),
                };
                handlers.quality.open_modal();
                handlers.submit_quality_check(&mut router, &form).await;
            }
            "activity" => {
                let limit = rest
                    .first()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10usize);
                match gateway.recent_activity(limit).await {
                    Ok(activities) => {
                        for a in &activities {
                            println!("{} {} ({})", a.timestamp, a.product_name, a.product_id);
                        }
                    }
                    Err(e) => warn!("activity fetch failed: {}", e),
                }
            }
            "report" => match rest.first() {
                Some(id) => match gateway.product_report(id).await {
                    Ok(r) => {
                        println!("Report for {} ({})", r.product_name, r.product_id);
                        println!("  Origin: {}", r.origin);
                        println!("  Current owner: {}", r.current_owner);
                        println!("  Transactions: {}", r.transaction_count);
                        println!("  Quality checks: {}", r.quality_checks);
                        println!("  Final price: ${}", r.final_price);
                        println!("  Price increase: {:.1}%", r.price_increase_percent);
                        println!("  Stakeholders involved: {}", r.stakeholders_involved);
                    }
                    Err(e) => warn!("report fetch failed: {}", e),
                },
                None => println!("usage: report <product_id>"),
            },
            "stakeholders" => router.reload_directory().await,
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }

        print_section(&router);
        for n in notifier.active() {
            println!("[{:?}] {}", n.severity, n.message);
        }
    }

    Ok(())
}

fn print_section(router: &ViewRouter) {
    let section = router.document().active();
    println!("--- {} ---", section);
    println!("{}", router.document().html(section));
}

fn print_help() {
    println!("Commands:");
    println!("  dashboard | products | analytics | register");
    println!("  track <product_id>");
    println!("  analyze <product_id>");
    println!("  verify <product_id>");
    println!("  new <name>|<origin>|<harvest_date>|<quality>[|farmer_id]");
    println!("  transfer <product_id> <from> <to> <price> [quality note]");
    println!("  check <product_id> <checked_by> <quality note>");
    println!("  activity [limit]");
    println!("  report <product_id>");
    println!("  stakeholders   (reload the directory)");
    println!("  quit");
}
