use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use dotenvy::dotenv;
use schoolhub_cli::accounts::{NewAdmin, create_admin};
use schoolhub_cli::export::{collection_json, read_backup, write_json};
use schoolhub_cli::seeder::{self, SeedConfig};
use schoolhub_config::StorageConfig;
use schoolhub_models::Collection;
use schoolhub_store::SchoolStore;

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for Southern Cross SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account without the registration code
    CreateAdmin {
        /// Full name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Username used to log in
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed fake students into every class and add fake teachers
    Seed {
        /// Number of students per class
        #[arg(short = 's', long, default_value = "20")]
        students: usize,

        /// Number of teachers to add
        #[arg(short = 't', long, default_value = "5")]
        teachers: usize,

        /// Fee total for each seeded student
        #[arg(long, default_value = "5000")]
        fee: f64,
    },
    /// Export one collection as JSON
    Export {
        /// Collection name, e.g. students or fees
        collection: String,

        /// Output file (defaults to <collection>_export.json)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Write a full backup of data, users and audit log
    Backup {
        /// Output file (defaults to schoolhub_backup_<date>.json)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Replace data, users and audit log with a backup file
    Restore {
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Return school data to the default dataset (keeps accounts)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let config = StorageConfig::from_env();

    let store = match SchoolStore::open_dir(&config).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open data directory {}: {}", config.data_dir.display(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            username,
            password,
        } => handle_create_admin(&store, name, email, username, password).await,
        Commands::Seed {
            students,
            teachers,
            fee,
        } => handle_seed(&store, students, teachers, fee).await,
        Commands::Export { collection, output } => handle_export(&store, &collection, output).await,
        Commands::Backup { output } => handle_backup(&store, output).await,
        Commands::Restore { file, yes } => handle_restore(&store, file, yes).await,
        Commands::Reset { yes } => handle_reset(&store, yes).await,
    }
}

fn prompt(label: &str) -> String {
    Input::new().with_prompt(label).interact_text().unwrap_or_else(|e| {
        eprintln!("❌ Failed to read {}: {}", label.to_lowercase(), e);
        std::process::exit(1);
    })
}

fn confirmed(question: &str, yes: bool) -> bool {
    if yes {
        return true;
    }
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn fail(action: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ Error {}: {}", action, e);
    std::process::exit(1);
}

async fn handle_create_admin(
    store: &SchoolStore,
    name: Option<String>,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| prompt("Full name"));
    let email = email.unwrap_or_else(|| prompt("Email address"));
    let username = username.unwrap_or_else(|| prompt("Username"));
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("reading password", e))
    });

    let admin = NewAdmin {
        name,
        email,
        username,
        password,
    };
    match create_admin(store, admin).await {
        Ok(user) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", user.username);
            println!("   Name: {}", user.name);
        }
        Err(e) => fail("creating admin", e),
    }
}

async fn handle_seed(store: &SchoolStore, students: usize, teachers: usize, fee: f64) {
    let config = SeedConfig::new(students)
        .with_teachers(teachers)
        .with_fee_total(fee);

    match seeder::seed_all(store, config).await {
        Ok(summary) => {
            println!(
                "✅ Created {} students and {} teachers",
                summary.students, summary.teachers
            );
        }
        Err(e) => fail("seeding data", e),
    }
}

async fn handle_export(store: &SchoolStore, collection: &str, output: Option<PathBuf>) {
    let collection: Collection = collection.parse().unwrap_or_else(|e| fail("exporting", e));
    let value = match store.read(|s| collection_json(&s.data, collection)).await {
        Ok(value) => value,
        Err(e) => fail("exporting", e),
    };
    let path = output.unwrap_or_else(|| PathBuf::from(collection.export_file_name()));

    if let Err(e) = write_json(&path, &value) {
        fail("writing export", e);
    }
    if let Err(e) = store
        .record_audit("cli", "export_data", format!("{} data exported", collection))
        .await
    {
        fail("recording audit entry", e);
    }
    println!("✅ Exported {} to {}", collection, path.display());
}

async fn handle_backup(store: &SchoolStore, output: Option<PathBuf>) {
    let bundle = store.backup().await;
    let path = output.unwrap_or_else(|| PathBuf::from(bundle.file_name()));

    if let Err(e) = write_json(&path, &bundle) {
        fail("writing backup", e);
    }
    if let Err(e) = store
        .record_audit("cli", "backup_created", "System backup created")
        .await
    {
        fail("recording audit entry", e);
    }
    println!(
        "✅ Backup written to {} ({} students, {} users)",
        path.display(),
        bundle.data.students.len(),
        bundle.users.len()
    );
}

async fn handle_restore(store: &SchoolStore, file: PathBuf, yes: bool) {
    let bundle = read_backup(&file).unwrap_or_else(|e| fail("reading backup", e));

    let question = format!(
        "Restore backup from {}? This replaces all current data",
        bundle.timestamp.format("%Y-%m-%d %H:%M")
    );
    if !confirmed(&question, yes) {
        println!("Restore cancelled");
        return;
    }

    match store.restore(bundle, "cli").await {
        Ok(()) => println!("✅ Restore completed"),
        Err(e) => fail("restoring backup", e),
    }
}

async fn handle_reset(store: &SchoolStore, yes: bool) {
    if !confirmed("Reset all school data to defaults? Accounts are kept", yes) {
        println!("Reset cancelled");
        return;
    }

    match store.reset("cli").await {
        Ok(()) => println!("✅ School data reset to defaults"),
        Err(e) => fail("resetting data", e),
    }
}
