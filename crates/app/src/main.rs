use clap::{Args, Parser, Subcommand};

use client::{ApiClient, Credentials, GroupContext};
use engine::{AllocationSession, MoneyCents, TableMode};

mod config;
mod error;

#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(about = "Record and reconcile shared group expenses")]
struct Cli {
    #[command(flatten)]
    config: config::ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the group's expenses, newest first.
    List(ListArgs),
    /// Show one expense with its split table.
    Show(ShowArgs),
    /// Add a new expense, split equally unless overridden.
    Add(AddArgs),
    /// Update an expense you paid for.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Keep fetching pages until the server runs out.
    #[arg(long)]
    all: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(long)]
    expense: i64,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    amount: MoneyCents,
    #[arg(long)]
    description: String,
    /// Override one member's owed share, as `<member>=<amount>`. Repeatable.
    #[arg(long = "owed", value_parser = parse_share)]
    owed: Vec<(String, MoneyCents)>,
    /// Override one member's paid contribution (not the payer's, which
    /// always tracks the total). Repeatable.
    #[arg(long = "paid", value_parser = parse_share)]
    paid: Vec<(String, MoneyCents)>,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    expense: i64,
    /// New total; resets every share to the equal split before overrides.
    #[arg(long)]
    amount: Option<MoneyCents>,
    #[arg(long)]
    description: String,
    #[arg(long = "owed", value_parser = parse_share)]
    owed: Vec<(String, MoneyCents)>,
    #[arg(long = "paid", value_parser = parse_share)]
    paid: Vec<(String, MoneyCents)>,
}

fn parse_share(raw: &str) -> Result<(String, MoneyCents), String> {
    let (member, amount) = raw
        .split_once('=')
        .ok_or_else(|| "expected <member>=<amount>".to_string())?;
    if member.trim().is_empty() {
        return Err("member must not be empty".to_string());
    }
    let amount: MoneyCents = amount.parse().map_err(|err| format!("{err}"))?;
    Ok((member.trim().to_string(), amount))
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitledger={level},client={level},engine={level}",
            level = settings.level
        ))
        .init();

    let credentials = Credentials::new(&settings.token, &settings.username)?;
    let api = ApiClient::new(&settings.base_url, credentials)?;

    let mut context = GroupContext::new(settings.group, settings.page_size);
    context.load_group(&api).await?;
    if let Some(group) = context.group() {
        tracing::info!(
            group_id = group.id,
            members = context.participants().len(),
            "group loaded"
        );
    }

    match cli.command {
        Command::List(args) => list(&api, &mut context, &args).await,
        Command::Show(args) => show(&api, &context, &args).await,
        Command::Add(args) => add(&api, &mut context, &args).await,
        Command::Edit(args) => edit(&api, &mut context, &args).await,
    }
}

async fn list(api: &ApiClient, context: &mut GroupContext, args: &ListArgs) -> error::Result<()> {
    let mut has_more = context.refresh(api).await?;
    while args.all && has_more {
        has_more = context.load_more(api).await?;
    }

    if context.working_set().is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    for record in context.working_set().entries() {
        let date = record
            .date
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "#{:<6} {}  {:<30} paid by {:<12} -{}",
            record.id, date, record.description, record.paid_by, record.amount
        );
        if !record.splits.is_empty() {
            let shares: Vec<String> = record
                .splits
                .iter()
                .map(|split| format!("{}: ₹{:.2}", split.member, split.owed))
                .collect();
            println!("        split: {}", shares.join(", "));
        }
    }
    if has_more {
        println!("(more expenses available, pass --all to fetch everything)");
    }
    Ok(())
}

async fn show(api: &ApiClient, context: &GroupContext, args: &ShowArgs) -> error::Result<()> {
    let session = context
        .open_expense(api, args.expense, TableMode::View)
        .await?;
    print_table(&session);
    Ok(())
}

async fn add(api: &ApiClient, context: &mut GroupContext, args: &AddArgs) -> error::Result<()> {
    let mut session = context.new_expense(api, args.amount)?;
    apply_overrides(&mut session, &args.owed, &args.paid)?;
    print_table(&session);

    let saved = context.submit(api, &session, &args.description).await?;
    println!("Expense #{} saved.", saved.id);
    context.refresh(api).await?;
    Ok(())
}

async fn edit(api: &ApiClient, context: &mut GroupContext, args: &EditArgs) -> error::Result<()> {
    let mut session = context
        .open_expense(api, args.expense, TableMode::Edit)
        .await?;
    if let Some(amount) = args.amount {
        session.set_total(amount)?;
    }
    apply_overrides(&mut session, &args.owed, &args.paid)?;
    print_table(&session);

    let saved = context.submit(api, &session, &args.description).await?;
    println!("Expense #{} updated.", saved.id);
    context.refresh(api).await?;
    Ok(())
}

fn apply_overrides(
    session: &mut AllocationSession,
    owed: &[(String, MoneyCents)],
    paid: &[(String, MoneyCents)],
) -> error::Result<()> {
    for (member, amount) in owed {
        session.edit_owed(member, *amount)?;
    }
    for (member, amount) in paid {
        session.edit_paid(member, *amount)?;
    }
    Ok(())
}

fn print_table(session: &AllocationSession) {
    for row in session.row_displays() {
        let marker = if row.is_payer { " (payer)" } else { "" };
        println!(
            "{:<16} owed {:>10}  paid {:>10}  {}{}",
            row.member, row.owed, row.paid, row.net, marker
        );
    }
    let summary = session.recompute();
    println!(
        "total owed {}  total paid {}  {}",
        summary.sum_owed,
        summary.sum_paid,
        summary.status_line(session.total())
    );
}
