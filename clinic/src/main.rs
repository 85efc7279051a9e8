//! Developer command line for exercising the clinic client core.
//!
//! Sessions persist under the configured storage directory and are
//! authenticated against the in-memory fixture accounts, so a sign-in
//! survives between invocations.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tokio::time;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use clinic::ClientSettings;
use clinic::domain::ports::{
    AlwaysAvailable, DoctorDirectory, FixtureAuthService, FixtureBookingService,
    FixtureDoctorDirectory, FixtureNotificationSource,
};
use clinic::domain::{
    AppointmentDraft, AppointmentIntake, IntakeError, Landing, LoginCredentials,
    NotificationCounter, SchedulingValidator, SessionState, SessionStore, format_date_input,
    generate_time_slots,
};
use clinic::outbound::storage::FileKeyValueStore;

/// `clinic` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clinic",
    about = "Inspect scheduling rules and drive a persisted clinic session",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List the bookable time slots.
    Slots,
    /// Mask and validate a date against the booking window.
    CheckDate {
        /// Date digits or `DD/MM/YYYY` text.
        text: String,
    },
    /// List the bookable doctors.
    Doctors,
    /// Show the persisted session and where it lands.
    Session,
    /// Sign in and persist the session.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the persisted session.
    SignOut,
    /// Fetch the unread notification badge for the persisted session.
    Unread,
    /// Validate and book an appointment.
    Book {
        #[arg(long = "doctor", value_name = "id")]
        doctor_id: String,
        #[arg(long, value_name = "DD/MM/YYYY")]
        date: String,
        #[arg(long, value_name = "HH:MM")]
        time: String,
        #[arg(long)]
        description: String,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let settings = ClientSettings::load_from_iter([OsString::from("clinic")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;
    let validator = SchedulingValidator::new(Arc::new(DefaultClock), settings.booking_window());

    match args.command {
        Command::Slots => {
            for slot in generate_time_slots() {
                println!("{slot}");
            }
            Ok(())
        }
        Command::CheckDate { text } => check_date(&validator, &text),
        Command::Doctors => {
            let doctors = FixtureDoctorDirectory
                .list()
                .await
                .map_err(|error| io::Error::other(format!("list doctors: {error}")))?;
            for doctor in doctors {
                println!("{}\t{}\t{}", doctor.id, doctor.name, doctor.specialty);
            }
            Ok(())
        }
        Command::Session => {
            let store = open_session(&settings).await?;
            print_state(&store.state())
        }
        Command::SignIn { email, password } => {
            let store = open_session(&settings).await?;
            let credentials = LoginCredentials::try_from_parts(&email, &password)
                .map_err(|error| io::Error::other(format!("invalid credentials: {error}")))?;
            store
                .sign_in(&credentials)
                .await
                .map_err(|error| io::Error::other(format!("sign-in failed: {error}")))?;
            print_state(&store.state())
        }
        Command::SignOut => {
            let store = open_session(&settings).await?;
            store.sign_out().await;
            print_state(&store.state())
        }
        Command::Unread => {
            let store = Arc::new(open_session(&settings).await?);
            unread(store, &settings).await
        }
        Command::Book {
            doctor_id,
            date,
            time,
            description,
        } => {
            let intake = AppointmentIntake::new(
                validator,
                Arc::new(AlwaysAvailable),
                Arc::new(FixtureBookingService),
            );
            let mut draft = AppointmentDraft::new();
            draft
                .select_doctor(doctor_id)
                .enter_date(&date)
                .select_time(time)
                .describe(description);
            match intake.submit(&draft).await {
                Ok(request) => {
                    let json = serde_json::to_string(&request)
                        .map_err(|error| io::Error::other(format!("encode request: {error}")))?;
                    println!("{json}");
                    Ok(())
                }
                Err(IntakeError::Rejected(rejection)) => {
                    Err(io::Error::other(format!("appointment rejected: {rejection}")))
                }
                Err(IntakeError::Collaborator(error)) => {
                    Err(io::Error::other(format!("booking failed: {error}")))
                }
            }
        }
    }
}

fn check_date(validator: &SchedulingValidator, text: &str) -> io::Result<()> {
    let masked = format_date_input(text);
    match validator.resolve_date(&masked) {
        Ok(date) => {
            println!("{masked}\t{date}");
            Ok(())
        }
        Err(error) => Err(io::Error::other(format!("{masked}: {error}"))),
    }
}

async fn unread(store: Arc<SessionStore>, settings: &ClientSettings) -> io::Result<()> {
    if store.state().identity().is_none() {
        println!("signed out");
        return Ok(());
    }
    let counter_settings = settings.counter_settings();
    let counter = NotificationCounter::spawn(
        Arc::new(FixtureNotificationSource),
        store,
        counter_settings,
    );
    let mut updates = counter.subscribe();
    let fetched = time::timeout(counter_settings.fetch_timeout, updates.changed()).await;
    let (count, badge) = (counter.count(), counter.badge());
    counter.shutdown().await;
    match fetched {
        Ok(Ok(())) => {
            println!("{count}\t{badge}");
            Ok(())
        }
        _ => Err(io::Error::other("unread count unavailable")),
    }
}

async fn open_session(settings: &ClientSettings) -> io::Result<SessionStore> {
    let root = Utf8PathBuf::from_path_buf(settings.storage_dir()).map_err(|path| {
        io::Error::other(format!("storage dir is not UTF-8: {}", path.display()))
    })?;
    let storage = FileKeyValueStore::open(&root)
        .map_err(|error| io::Error::other(format!("open storage: {error}")))?;
    let store = SessionStore::new(
        Arc::new(FixtureAuthService::new()),
        Arc::new(storage),
        settings.session_timeouts(),
    );
    store.restore().await;
    Ok(store)
}

fn print_state(state: &SessionState) -> io::Result<()> {
    match (state.landing(), state.identity()) {
        (Some(Landing::Dashboard(dashboard)), Some(identity)) => {
            let json = serde_json::to_string(identity)
                .map_err(|error| io::Error::other(format!("encode identity: {error}")))?;
            println!("{dashboard:?}\t{json}");
        }
        (Some(Landing::SignIn), _) => println!("signed out"),
        _ => println!("loading"),
    }
    Ok(())
}
