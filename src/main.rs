use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use timeclock::app::App;
use timeclock::config::Config;
use timeclock::logging;
use timeclock::rest::{self, ApiState};
use timeclock::session::{FileSessionStore, SessionStore};
use timeclock::types::{ClockInRoleType, ClockInType, ViewFlags, WorkRole};
use timeclock::{roles, ClockInWizard, WizardStep};

#[derive(Parser)]
#[command(name = "timeclock")]
#[command(about = "Employee clock-in wizard and timesheet submission")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (default: rest_api.port, 7010)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the roles a user with the given permissions can clock in as
    Roles {
        #[arg(long)]
        mechanic: bool,
        #[arg(long)]
        labor: bool,
        #[arg(long)]
        truck: bool,
        #[arg(long)]
        tasco: bool,
    },

    /// Clock in by driving the wizard end to end
    ClockIn(ClockInArgs),

    /// List or clear the local session history
    Sessions {
        /// Only show (or clear) this user's sessions
        #[arg(long)]
        user: Option<String>,

        /// Remove the stored sessions (every user's unless --user is given)
        #[arg(long)]
        clear: bool,
    },
}

#[derive(clap::Args)]
struct ClockInArgs {
    /// User id
    #[arg(long)]
    user: String,

    /// Role (mechanic, general, truck, tasco)
    #[arg(long)]
    role: WorkRole,

    /// Sub-role, e.g. truckDriver or tascoFEquipment
    #[arg(long)]
    sub_role: Option<ClockInRoleType>,

    /// Jobsite id or QR code
    #[arg(long)]
    jobsite: String,

    /// Cost code id or code
    #[arg(long)]
    cost_code: Option<String>,

    /// Equipment id or tag
    #[arg(long)]
    equipment: Option<String>,

    /// Truck id or number
    #[arg(long)]
    truck: Option<String>,

    /// Material hauled (Tasco)
    #[arg(long)]
    material: Option<String>,

    /// Starting odometer reading (truck drivers)
    #[arg(long)]
    mileage: Option<u32>,

    /// Close this timesheet and switch jobs
    #[arg(long)]
    switch_from: Option<String>,

    /// Comment for the job being closed
    #[arg(long, requires = "switch_from")]
    comment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let long_running = matches!(cli.command, Commands::Serve { .. });
    let logging_handle = logging::init_logging(&config, long_running, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        eprintln!("Logging to {}", path.display());
    }

    match cli.command {
        Commands::Serve { port } => cmd_serve(config, port).await?,
        Commands::Roles {
            mechanic,
            labor,
            truck,
            tasco,
        } => cmd_roles(ViewFlags {
            mechanic_view: mechanic,
            labor_view: labor,
            truck_view: truck,
            tasco_view: tasco,
        }),
        Commands::ClockIn(args) => cmd_clock_in(config, args).await?,
        Commands::Sessions { user, clear } => cmd_sessions(&config, user, clear).await?,
    }

    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.rest_api.port);
    let state = ApiState::from_config(config)?;
    rest::serve(state, port).await
}

fn cmd_roles(flags: ViewFlags) {
    let available = roles(&flags);
    if available.is_empty() {
        println!("No roles enabled.");
        return;
    }

    for role in &available {
        let sub_roles: Vec<&str> = role.sub_roles().iter().map(|s| s.key()).collect();
        println!("{:<10} {:<14} {}", role.key(), role.label(), sub_roles.join(", "));
    }
    if let [only] = available.as_slice() {
        println!();
        println!("Only {} is available; it will be selected automatically.", only.label());
    }
}

async fn cmd_clock_in(config: Config, args: ClockInArgs) -> Result<()> {
    let app = App::new(config)?;
    let catalog = app
        .catalog
        .load()
        .await
        .context("Failed to load reference data")?;

    let lookup = |kind: &str, found: Option<&timeclock::types::SelectOption>, key: &str| {
        found
            .cloned()
            .with_context(|| format!("Unknown {} '{}'", kind, key))
    };

    let clock_in_type = match &args.switch_from {
        Some(previous) => ClockInType::SwitchJobs {
            previous_timesheet_id: previous.clone(),
            comment: args.comment.clone(),
        },
        None => ClockInType::Jobsite,
    };

    let flags = ViewFlags {
        mechanic_view: args.role == WorkRole::Mechanic,
        labor_view: args.role == WorkRole::General,
        truck_view: args.role == WorkRole::Truck,
        tasco_view: args.role == WorkRole::Tasco,
    };

    let mut wizard = ClockInWizard::new(app.context.clone(), args.user.clone(), clock_in_type);
    wizard.start(flags).await?;
    wizard.select_role(args.role, args.sub_role)?;
    if wizard.step() == WizardStep::RoleSelect {
        wizard.handle_next_step().await?;
    }

    let jobsite = lookup("jobsite", catalog.find_jobsite(&args.jobsite), &args.jobsite)?;
    wizard.set_jobsite(jobsite)?;

    loop {
        match wizard.step() {
            WizardStep::MaterialSelect => {
                let Some(material) = &args.material else {
                    bail!("--material is required for this Tasco shift");
                };
                wizard.set_material_type(material.clone())?;
            }
            WizardStep::Detail => {
                if let Some(key) = &args.cost_code {
                    wizard.set_cost_code(lookup("cost code", catalog.find_cost_code(key), key)?)?;
                }
                if let Some(key) = &args.equipment {
                    wizard.set_equipment(lookup("equipment", catalog.find_equipment(key), key)?)?;
                }
                if let Some(key) = &args.truck {
                    wizard.set_truck(lookup("truck", catalog.find_truck(key), key)?)?;
                }
                if let Some(mileage) = args.mileage {
                    wizard.set_starting_mileage(mileage)?;
                }
            }
            _ => {}
        }

        if wizard.view().can_submit {
            break;
        }
        wizard.handle_next_step().await?;
    }

    let outcome = wizard.submit().await?;
    println!("Clocked in.");
    println!("  timesheet: {}", outcome.timesheet_id);
    println!("  session:   {}", outcome.session_id);
    println!("  next:      {}", outcome.redirect);
    Ok(())
}

async fn cmd_sessions(config: &Config, user: Option<String>, clear: bool) -> Result<()> {
    let store = FileSessionStore::open(config.sessions_file())?;

    let mut sessions = store.list_sessions().await?;
    if let Some(user) = &user {
        sessions.retain(|s| &s.user_id == user);
    }

    if clear {
        let mut users: Vec<String> = match user {
            Some(user) => vec![user],
            None => sessions.iter().map(|s| s.user_id.clone()).collect(),
        };
        users.sort();
        users.dedup();
        for user_id in &users {
            store.clear_sessions(user_id).await?;
        }
        println!("Session history cleared for {} user(s).", users.len());
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions recorded.");
        return Ok(());
    }

    for session in sessions {
        let current = store.current_session_id(&session.user_id).await?;
        let marker = if current.as_deref() == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        let ended = session
            .end_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "open".to_string());
        println!(
            "{} {}  user={}  started={}  ended={}  timesheet={}",
            marker,
            session.id,
            session.user_id,
            session.start_time.to_rfc3339(),
            ended,
            session.timesheet_id.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
