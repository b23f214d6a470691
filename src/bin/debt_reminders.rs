use chrono::{Local, NaiveDate};
use clap::Parser;
use dotenvy::dotenv;
use fractic_debt_reminders::{
    config::Config,
    entities::{CustomerId, DateWindow, DispatchEvent, TargetOutcome},
    logic::CancelHandle,
    util::DefaultDebtReminderUtil,
};
use fractic_server_error::ServerError;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "debt-reminders",
    version,
    about = "List customers in debt and send them paced payment reminders"
)]
struct Cli {
    /// Ledger search term (name, phone, ...). Empty matches everyone.
    #[arg(short = 's', long = "search", default_value = "")]
    search: String,

    /// First day of the open-invoice window (YYYY-MM-DD). Defaults to today.
    #[arg(long = "from")]
    from: Option<NaiveDate>,

    /// Last day of the open-invoice window (YYYY-MM-DD). Defaults to today.
    #[arg(long = "to")]
    to: Option<NaiveDate>,

    /// Send a reminder to every listed customer.
    #[arg(long = "send-all", conflicts_with = "send")]
    send_all: bool,

    /// Send reminders to these customer ids, in the given order.
    #[arg(long = "send", value_delimiter = ',')]
    send: Vec<CustomerId>,

    /// Date printed in messages using the {{AsOfDate}} placeholder.
    #[arg(long = "as-of")]
    as_of: Option<NaiveDate>,

    /// Log the links instead of opening them.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if cli.dry_run {
        config.channel.dry_run = true;
    }

    let mut util = DefaultDebtReminderUtil::from_config(&config)?;

    let today = Local::now().date_naive();
    let window = DateWindow::new(cli.from.unwrap_or(today), cli.to.unwrap_or(today));
    util.refresh_window(&cli.search, &window).await?;
    print_working_set(&util);

    if cli.send_all {
        util.select_all_displayed();
    } else if cli.send.is_empty() {
        return Ok(());
    }

    let cancel = CancelHandle::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current reminder.");
                cancel.cancel();
            }
        }
    });

    let mut cancelled = false;
    let on_event = |event: &DispatchEvent| match event {
        DispatchEvent::Target {
            progress,
            customer_id,
            outcome,
        } => {
            let status = match outcome {
                TargetOutcome::Sent => "sent",
                TargetOutcome::Failed => "FAILED",
                TargetOutcome::NoUsablePhone => "skipped (no usable phone)",
                TargetOutcome::NotFound => "skipped (not in list)",
            };
            println!(
                "[{}/{}] {}: {}",
                progress.current_index + 1,
                progress.total(),
                customer_id,
                status
            );
        }
        DispatchEvent::Finished {
            cancelled: was_cancelled,
            ..
        } => cancelled = *was_cancelled,
    };
    let summary = if cli.send_all {
        util.dispatch_selected(cli.as_of, cancel, on_event).await
    } else {
        util.dispatch(cli.send.clone(), cli.as_of, cancel, on_event)
            .await
    };

    info!(
        "{} sent, {} failed, {} skipped{}.",
        summary.sent,
        summary.failed,
        summary.skipped,
        if cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

fn print_working_set(util: &DefaultDebtReminderUtil) {
    let working_set = util.working_set();
    if working_set.is_empty() {
        println!("No customers in debt.");
        return;
    }
    for record in working_set {
        println!(
            "{:>8}  {:<32}  {:<16}  {:>12}",
            record.id(),
            record.customer.name,
            record.customer.contact_phone().unwrap_or("-"),
            util.format_amount(record.debt()),
        );
    }
    println!(
        "{} customer(s), total debt {}",
        working_set.len(),
        util.format_amount(working_set.total_debt())
    );
}
