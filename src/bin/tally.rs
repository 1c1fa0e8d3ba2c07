use clap::{Parser, Subcommand};
use tally::report::{BalanceReport, MonthlySummary, RegisterReport, ReportParameters};
use tally::{Error, Journal, Ledger};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    about = "A double-entry accounting tool.",
    version = VERSION,
)]
struct Cli {
    /// Path to the journal file
    #[arg(short, long)]
    input: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate balances of the selected accounts
    Balances {
        /// Report query, e.g. `assets :excluding units :title Balance Sheet`
        query: Vec<String>,
    },
    /// Transaction register with a running total
    Register { query: Vec<String> },
    /// Cumulative month-end totals, e.g. net worth over time
    Monthly { query: Vec<String> },
}

fn parameters(query: &[String], default_title: &str) -> Result<ReportParameters, Error> {
    let today = chrono::Local::now().date_naive();
    ReportParameters::from_command(&query.join(" "), default_title, today)
}

fn print_balances(report: &BalanceReport) {
    println!("{}", report.title);
    println!("{}", report.subtitle);
    println!();
    for line in &report.lines {
        if line.is_grand_total {
            println!("{:-<44}", "");
            println!("{:>44}", line.balance);
        } else {
            let name = format!("{}{}", "  ".repeat(line.depth), line.display_name);
            println!("{:<32}{:>12}", name, line.balance);
        }
    }
}

fn print_register(report: &RegisterReport) {
    println!("{}", report.title);
    println!();
    for line in &report.lines {
        let date = line
            .date
            .map(|date| date.format("%Y/%m/%d").to_string())
            .unwrap_or_default();
        let description = line.description.as_deref().unwrap_or("");
        println!(
            "{:<11}{:<28}{:<28}{:>12}{:>12}",
            date, description, line.account, line.amount, line.total
        );
    }
}

fn print_monthly(report: &MonthlySummary) {
    println!("{}", report.title);
    println!();
    for point in &report.points {
        println!("{}  {:>12}", point.month.format("%Y/%m"), point.total);
    }
}

fn run(args: Cli, journal: &Journal) -> Result<(), Error> {
    match args.command {
        Commands::Balances { query } => {
            let params = parameters(&query, "Balance")?;
            print_balances(&BalanceReport::generate(journal, &params)?);
        }
        Commands::Register { query } => {
            let params = parameters(&query, "Register")?;
            print_register(&RegisterReport::generate(journal, &params)?);
        }
        Commands::Monthly { query } => {
            let params = parameters(&query, "Monthly Summary")?;
            print_monthly(&MonthlySummary::generate(journal, &params)?);
        }
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let args = Cli::parse();

    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("tally: couldn't read {}: {}", args.input, err);
            std::process::exit(1);
        }
    };
    let ledger = match Ledger::from_text(&text) {
        Ok(ledger) => ledger,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    let journal = Journal::from_ledger(&ledger);

    if let Err(err) = run(args, &journal) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
