//! Command-line front end for the shelter pet store.
//!
//! # Responsibility
//! - Stand in for the catalog/editor screens: list, show, add, edit and
//!   delete pets through the storage gateway.
//! - Map gateway outcomes to user-facing success/failure messages.

use clap::{Args, Parser, Subcommand};
use log::error;
use shelter_core::config::{resolve_db_path, LogSettings};
use shelter_core::{
    gender_from_label, init_logging, parse_weight, DeleteOutcome, EditorSession, GatewayError, Pet,
    PetAddress, PetFields, SaveOutcome, StorageGateway,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shelter", version, about = "Manage the shelter pet inventory")]
struct Cli {
    /// Store file (defaults to $SHELTER_DB_PATH, then the temp dir).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Print pets as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every pet.
    List,
    /// Show one pet.
    Get { id: i64 },
    /// Add a new pet.
    Add(PetArgs),
    /// Overwrite the given fields of a pet.
    Update {
        id: i64,
        #[command(flatten)]
        fields: PetArgs,
    },
    /// Delete one pet.
    Delete { id: i64 },
    /// Resolve a content address and print its rows.
    Uri { address: String },
}

#[derive(Args)]
struct PetArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    breed: Option<String>,
    /// Male, Female or anything else for unknown.
    #[arg(long)]
    gender: Option<String>,
    /// Unparsable values are stored as 0.
    #[arg(long)]
    weight: Option<String>,
}

impl PetArgs {
    fn to_fields(&self) -> PetFields {
        PetFields {
            name: self.name.as_deref().map(|name| name.trim().to_string()),
            breed: self.breed.as_deref().map(|breed| breed.trim().to_string()),
            gender: self
                .gender
                .as_deref()
                .map(|label| gender_from_label(label).code()),
            weight: self.weight.as_deref().map(parse_weight),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = LogSettings::resolve(cli.log_level.as_deref(), cli.log_dir.as_deref());
    if let Some(log_dir) = settings.log_dir.as_deref() {
        if let Err(err) = init_logging(&settings.level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, GatewayError> {
    let gateway = StorageGateway::initialize(resolve_db_path(cli.db.as_deref()))?;

    let code = match &cli.command {
        Command::List => {
            print_pets(&gateway.list_all()?, cli.json);
            ExitCode::SUCCESS
        }
        Command::Get { id } => {
            print_pets(&[gateway.get_by_id(*id)?], cli.json);
            ExitCode::SUCCESS
        }
        Command::Add(args) => add_pet(&gateway, args)?,
        Command::Update { id, fields } => {
            let rows = gateway.update_at(&PetAddress::item(*id), &fields.to_fields())?;
            let outcome = SaveOutcome::from_update_rows(rows);
            report(outcome.is_success(), outcome.message())
        }
        Command::Delete { id } => {
            let outcome = DeleteOutcome::from_rows(gateway.delete_at(&PetAddress::item(*id))?);
            report(outcome.is_success(), outcome.message())
        }
        Command::Uri { address } => {
            let address = PetAddress::parse(address)?;
            println!("{} ({})", address, address.mime_type());
            print_pets(&gateway.query(&address)?, cli.json);
            ExitCode::SUCCESS
        }
    };

    gateway.close()?;
    Ok(code)
}

fn add_pet(gateway: &StorageGateway, args: &PetArgs) -> Result<ExitCode, GatewayError> {
    let mut session = EditorSession::new_pet();
    if let Some(name) = &args.name {
        session.set_name(name.as_str());
    }
    if let Some(breed) = &args.breed {
        session.set_breed(breed.as_str());
    }
    if let Some(gender) = &args.gender {
        session.select_gender_label(gender);
    }
    if let Some(weight) = &args.weight {
        session.set_weight_text(weight.as_str());
    }

    match session.save(gateway) {
        Ok(outcome) => {
            println!("{}", outcome.message());
            if let Some(address) = session.address() {
                println!("{address}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(GatewayError::InvalidArgument(err)) => {
            eprintln!("{}: {err}", SaveOutcome::error_message(true));
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn report(success: bool, message: &str) -> ExitCode {
    if success {
        println!("{message}");
        ExitCode::SUCCESS
    } else {
        eprintln!("{message}");
        ExitCode::FAILURE
    }
}

fn print_pets(pets: &[Pet], json: bool) {
    if json {
        match serde_json::to_string_pretty(pets) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("failed to encode pets: {err}"),
        }
        return;
    }

    if pets.is_empty() {
        println!("No pets.");
        return;
    }
    for pet in pets {
        println!(
            "{:>4}  {:<20} {:<16} {:<8} {}",
            pet.id,
            pet.name,
            pet.breed.as_deref().unwrap_or("-"),
            pet.gender.label(),
            pet.weight
        );
    }
}
