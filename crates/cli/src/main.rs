use advisor_core::{
    Advisor, AdvisorError, CoreConfig, ExportFormat, MetricsForm, NonEmptyText, ProfileForm,
    ProfileService, ReportExport, Severity, StoredProfile, UserProfile,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "Symptom advice, health metrics and care lookup")]
struct Cli {
    /// Base data directory (overrides ADVISOR_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable symptoms and which sources cover them
    Symptoms,
    /// Analyse symptoms at one severity level
    Analyze {
        /// Symptom names
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Low, Medium or High
        #[arg(long, short)]
        severity: Severity,
        /// Also write the report as txt, pdf or json
        #[arg(long)]
        export: Option<ExportFormat>,
        /// Saved profile to head the exported report
        #[arg(long)]
        profile: Option<String>,
    },
    /// Show the reference link table
    Links {
        /// Open the link with this title in the default browser
        #[arg(long)]
        open: Option<String>,
    },
    /// Classify health metrics
    Assess {
        #[command(flatten)]
        metrics: MetricsArgs,
        /// Age in years (60 and over adds to the risk score)
        #[arg(long)]
        age: Option<String>,
    },
    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Find the nearest hospitals
    Hospitals {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Only hospitals offering this specialty
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Show emergency numbers
    Emergency {
        /// Country name (falls back to the international number)
        country: Option<String>,
    },
    /// Store a medical-history document
    Attach {
        file: PathBuf,
        /// Saved profile to record the document on
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Validate and save a profile with its metrics
    Save {
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        metrics: MetricsArgs,
    },
    /// Show a saved profile and its assessment
    Show { name: String },
    /// List saved profiles
    List,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    age: String,
    #[arg(long, default_value = "")]
    gender: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    medical_history: String,
    #[arg(long, default_value = "")]
    blood_type: String,
    #[arg(long, default_value = "")]
    allergies: String,
    #[arg(long, default_value = "")]
    emergency_contact: String,
}

impl From<ProfileArgs> for ProfileForm {
    fn from(args: ProfileArgs) -> Self {
        Self {
            name: args.name,
            age: args.age,
            gender: args.gender,
            location: args.location,
            medical_history: args.medical_history,
            blood_type: args.blood_type,
            allergies: args.allergies,
            emergency_contact: args.emergency_contact,
        }
    }
}

#[derive(Args)]
struct MetricsArgs {
    /// Blood pressure as systolic/diastolic, e.g. 120/80
    #[arg(long, default_value = "")]
    blood_pressure: String,
    /// Fasting blood glucose in mg/dL
    #[arg(long, default_value = "")]
    glucose: String,
    #[arg(long, default_value = "")]
    weight_kg: String,
    #[arg(long, default_value = "")]
    height_cm: String,
    /// First day of the last period (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    last_period: String,
    #[arg(long, default_value = "")]
    cycle_length: String,
}

impl From<MetricsArgs> for MetricsForm {
    fn from(args: MetricsArgs) -> Self {
        Self {
            blood_pressure: args.blood_pressure,
            fasting_glucose: args.glucose,
            weight_kg: args.weight_kg,
            height_cm: args.height_cm,
            last_period: args.last_period,
            cycle_length_days: args.cycle_length,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn resolve_config(data_dir: Option<String>) -> Result<CoreConfig, AdvisorError> {
    CoreConfig::from_values(
        data_dir.or_else(|| env_value("ADVISOR_DATA_DIR")),
        env_value("ADVISOR_SYMPTOMS_CSV"),
        env_value("ADVISOR_HOSPITALS_CSV"),
    )
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn load_profile(
    profiles: &ProfileService,
    name: &str,
) -> Result<StoredProfile, Box<dyn std::error::Error>> {
    let name = NonEmptyText::new(name)?;
    Ok(profiles.load(&name)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("advisor=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(cli.data_dir)?;
    let profiles = ProfileService::new(&cfg.profiles_dir(), &cfg.medical_history_dir());

    match cli.command {
        Some(Commands::Symptoms) => {
            let advisor = Advisor::new(&cfg);
            for warning in advisor.load_warnings() {
                eprintln!("Warning: {}", warning);
            }
            for symptom in advisor.known_symptoms() {
                let mut sources = Vec::new();
                if symptom.in_knowledge_base {
                    sources.push("advice");
                }
                if symptom.in_store {
                    sources.push("recorded");
                }
                println!("{} [{}]", symptom.name, sources.join(", "));
            }
        }
        Some(Commands::Analyze {
            symptoms,
            severity,
            export,
            profile,
        }) => {
            let advisor = Advisor::new(&cfg);
            for warning in advisor.load_warnings() {
                eprintln!("Warning: {}", warning);
            }
            let report = match advisor.analyze(&symptoms, severity) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Error analysing symptoms: {}", e);
                    return Ok(());
                }
            };
            println!("{}", report.render());

            if let Some(format) = export {
                let stored = match profile.as_deref() {
                    Some(name) => Some(load_profile(&profiles, name)?),
                    None => None,
                };
                let exporter = ReportExport::new(&cfg.reports_dir());
                match exporter.export(&report, stored.as_ref().map(|s| &s.profile), format, now()) {
                    Ok(path) => println!("Report saved to {}", path.display()),
                    Err(e) => eprintln!("Error exporting report: {}", e),
                }
            }
        }
        Some(Commands::Links { open }) => {
            let advisor = Advisor::new(&cfg);
            match open {
                Some(title) => match advisor.link(&title) {
                    Ok(link) => {
                        println!("Opening {}: {}", link.title, link.url);
                        if let Err(e) = webbrowser::open(&link.url) {
                            eprintln!("Error opening browser: {}", e);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
                None => {
                    for link in advisor.links() {
                        println!("{}: {}", link.title, link.url);
                    }
                }
            }
        }
        Some(Commands::Assess { metrics, age }) => {
            let age = advisor_core::validation::validate_age(age.as_deref().unwrap_or(""))?;
            let metrics = MetricsForm::from(metrics).parse()?;
            match metrics.assess(age) {
                Ok(assessment) => {
                    for line in assessment.summary_lines() {
                        println!("{}", line);
                    }
                }
                Err(e) => eprintln!("Error assessing metrics: {}", e),
            }
        }
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Save { profile, metrics } => {
                let profile = UserProfile::from_form(&ProfileForm::from(profile))?;
                let metrics = MetricsForm::from(metrics).parse()?;
                metrics.assess(profile.age)?;
                match profiles.save(&profile, &metrics, now()) {
                    Ok(path) => println!("Saved profile to {}", path.display()),
                    Err(e) => eprintln!("Error saving profile: {}", e),
                }
            }
            ProfileCommands::Show { name } => {
                let stored = load_profile(&profiles, &name)?;
                for line in stored.profile.summary_lines() {
                    println!("{}", line);
                }
                println!("Saved: {}", stored.saved_at.format("%Y-%m-%d %H:%M:%S"));
                match stored.metrics.assess(stored.profile.age) {
                    Ok(assessment) => {
                        for line in assessment.summary_lines() {
                            println!("{}", line);
                        }
                    }
                    Err(e) => eprintln!("Error assessing stored metrics: {}", e),
                }
            }
            ProfileCommands::List => {
                let names = profiles.list()?;
                if names.is_empty() {
                    println!("No profiles found.");
                } else {
                    for name in names {
                        println!("{}", name);
                    }
                }
            }
        },
        Some(Commands::Hospitals {
            lat,
            lon,
            specialty,
            limit,
        }) => {
            let advisor = Advisor::new(&cfg);
            match advisor.nearest_hospitals(lat, lon, specialty.as_deref(), limit) {
                Ok(nearby) if nearby.is_empty() => println!("No matching hospitals found."),
                Ok(nearby) => {
                    for n in nearby {
                        let h = &n.hospital;
                        println!(
                            "{} ({:.1} km) - {}, {} - {} - {}",
                            h.name,
                            n.distance_km,
                            h.address,
                            h.city,
                            h.contact,
                            h.specialties.join(", ")
                        );
                    }
                }
                Err(e) => eprintln!("Error finding hospitals: {}", e),
            }
        }
        Some(Commands::Emergency { country }) => {
            let advisor = Advisor::new(&cfg);
            for entry in advisor.emergency_contacts(country.as_deref()) {
                println!("{}: {}", entry.country, entry.number);
            }
        }
        Some(Commands::Attach { file, profile }) => match profile {
            Some(name) => {
                let mut stored = load_profile(&profiles, &name)?;
                let path = profiles.attach_medical_history(&mut stored.profile, &file, now())?;
                profiles.save(&stored.profile, &stored.metrics, now())?;
                println!("Attached {} to profile {}", path.display(), stored.profile.name);
            }
            None => {
                let mut scratch = UserProfile::named(NonEmptyText::new("anonymous")?);
                let path = profiles.attach_medical_history(&mut scratch, &file, now())?;
                println!("Stored {}", path.display());
            }
        },
        None => {
            println!("Use 'advisor --help' for commands");
        }
    }

    Ok(())
}
