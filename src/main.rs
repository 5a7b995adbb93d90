use std::io::{self, BufRead, Write};
use std::path::Path;

use advisor_core::{
    Advisor, AnalysisReport, CoreConfig, ExportFormat, MetricsForm, ProfileForm, ProfileService,
    ReportExport, Severity, UserProfile, Wizard, WizardStep,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Line-oriented prompt over stdin/stdout.
struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    /// Prints `label` and reads one trimmed line. `None` on end of input.
    fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_or_empty(&mut self, label: &str) -> anyhow::Result<String> {
        Ok(self.ask(label)?.unwrap_or_default())
    }
}

/// Session state for the main menu.
struct Session {
    advisor: Advisor,
    profiles: ProfileService,
    exporter: ReportExport,
    wizard: Wizard,
    last_report: Option<AnalysisReport>,
}

/// Interactive health advisor.
///
/// Walks the user through profile intake, metrics intake and then a main menu for symptom
/// analysis, report export, reference links, hospital search and emergency numbers.
///
/// # Environment Variables
/// - `ADVISOR_DATA_DIR`: base directory for data files and outputs (default: ".")
/// - `ADVISOR_SYMPTOMS_CSV`: symptom table (default: "<base>/symptoms_data.csv")
/// - `ADVISOR_HOSPITALS_CSV`: hospital table (default: "<base>/hospitals.csv")
/// - `RUST_LOG`: log filter; logs go to stderr
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("advisor=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cfg = CoreConfig::from_values(
        std::env::var("ADVISOR_DATA_DIR").ok(),
        std::env::var("ADVISOR_SYMPTOMS_CSV").ok(),
        std::env::var("ADVISOR_HOSPITALS_CSV").ok(),
    )?;
    tracing::info!("++ Starting health advisor with data in {}", cfg.data_dir().display());

    let advisor = Advisor::new(&cfg);
    for warning in advisor.load_warnings() {
        println!("Warning: {warning}");
    }

    let mut session = Session {
        advisor,
        profiles: ProfileService::new(&cfg.profiles_dir(), &cfg.medical_history_dir()),
        exporter: ReportExport::new(&cfg.reports_dir()),
        wizard: Wizard::new(),
        last_report: None,
    };
    let mut prompt = Prompt {
        input: io::stdin().lock(),
    };

    println!("=== HEALTH ADVISOR ===");
    loop {
        let keep_going = match session.wizard.step() {
            WizardStep::Profile => profile_step(&mut session, &mut prompt)?,
            WizardStep::Metrics => metrics_step(&mut session, &mut prompt)?,
            WizardStep::MainApp => main_menu(&mut session, &mut prompt)?,
        };
        if !keep_going {
            break;
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn step_banner(step: WizardStep, title: &str) {
    println!("\n--- Step {} of 3: {title} ---", step.number());
}

fn profile_step<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<bool> {
    step_banner(WizardStep::Profile, "Your profile");
    let Some(name) = p.ask("Name")? else {
        return Ok(false);
    };
    let form = ProfileForm {
        name,
        age: p.ask_or_empty("Age")?,
        gender: p.ask_or_empty("Gender")?,
        location: p.ask_or_empty("Location")?,
        medical_history: p.ask_or_empty("Medical history")?,
        blood_type: p.ask_or_empty("Blood type (e.g. O+)")?,
        allergies: p.ask_or_empty("Allergies")?,
        emergency_contact: p.ask_or_empty("Emergency contact number")?,
    };

    let mut profile = match UserProfile::from_form(&form) {
        Ok(profile) => profile,
        Err(e) => {
            println!("Error: {e}");
            return Ok(true);
        }
    };

    let document = p.ask_or_empty("Medical history document to attach (path, blank to skip)")?;
    if !document.is_empty() {
        match s
            .profiles
            .attach_medical_history(&mut profile, Path::new(&document), now())
        {
            Ok(path) => println!("Stored document at {}", path.display()),
            Err(e) => println!("Error attaching document: {e}"),
        }
    }

    s.wizard.submit_profile(profile)?;
    Ok(true)
}

fn metrics_step<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<bool> {
    step_banner(WizardStep::Metrics, "Health metrics (blank to skip)");
    let Some(blood_pressure) = p.ask("Blood pressure (e.g. 120/80)")? else {
        return Ok(false);
    };
    let form = MetricsForm {
        blood_pressure,
        fasting_glucose: p.ask_or_empty("Fasting blood sugar (mg/dL)")?,
        weight_kg: p.ask_or_empty("Weight (kg)")?,
        height_cm: p.ask_or_empty("Height (cm)")?,
        last_period: p.ask_or_empty("Last period start (YYYY-MM-DD)")?,
        cycle_length_days: p.ask_or_empty("Cycle length (days)")?,
    };

    let metrics = match form.parse() {
        Ok(metrics) => metrics,
        Err(e) => {
            println!("Error: {e}");
            return Ok(true);
        }
    };

    match s.wizard.submit_metrics(metrics) {
        Ok(assessment) => {
            println!("\n=== HEALTH ASSESSMENT ===");
            for line in assessment.summary_lines() {
                println!("{line}");
            }
        }
        Err(e) => {
            println!("Error: {e}");
            return Ok(true);
        }
    }

    if let (Some(profile), Some(metrics)) = (s.wizard.profile(), s.wizard.metrics()) {
        match s.profiles.save(profile, metrics, now()) {
            Ok(path) => println!("Profile saved to {}", path.display()),
            Err(e) => println!("Error saving profile: {e}"),
        }
    }
    Ok(true)
}

fn main_menu<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<bool> {
    println!("\n--- Step 3 of 3: Main menu ---");
    println!("1) Analyse symptoms");
    println!("2) Export last report");
    println!("3) Health resources");
    println!("4) Nearest hospitals");
    println!("5) Emergency numbers");
    println!("q) Quit");

    let Some(choice) = p.ask("Choice")? else {
        return Ok(false);
    };
    match choice.as_str() {
        "1" => analyse(s, p)?,
        "2" => export(s, p)?,
        "3" => links(s, p)?,
        "4" => hospitals(s, p)?,
        "5" => {
            let country = p.ask_or_empty("Country (blank for all)")?;
            let country = (!country.is_empty()).then_some(country.as_str());
            for entry in s.advisor.emergency_contacts(country) {
                println!("{}: {}", entry.country, entry.number);
            }
        }
        "q" | "Q" => return Ok(false),
        other => println!("Unknown choice '{other}'"),
    }
    Ok(true)
}

fn analyse<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<()> {
    let known: Vec<String> = s
        .advisor
        .known_symptoms()
        .into_iter()
        .map(|k| k.name)
        .collect();
    if !known.is_empty() {
        println!("Known symptoms: {}", known.join(", "));
    }

    let selection = p.ask_or_empty("Symptoms (comma separated)")?;
    let severity = match p.ask_or_empty("Severity (Low/Medium/High)")?.parse::<Severity>() {
        Ok(severity) => severity,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };

    match s.advisor.analyze(selection.split(','), severity) {
        Ok(report) => {
            println!("\n{}", report.render());
            s.last_report = Some(report);
        }
        Err(e) => println!("Warning: {e}"),
    }
    Ok(())
}

fn export<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<()> {
    let Some(report) = &s.last_report else {
        println!("Analyse symptoms first.");
        return Ok(());
    };
    let format = match p.ask_or_empty("Format (txt/pdf/json)")?.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };
    match s
        .exporter
        .export(report, s.wizard.profile(), format, now())
    {
        Ok(path) => println!("Report saved to {}", path.display()),
        Err(e) => println!("Error exporting report: {e}"),
    }
    Ok(())
}

fn links<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<()> {
    for (number, link) in s.advisor.links().iter().enumerate() {
        println!("{}) {}: {}", number + 1, link.title, link.url);
    }
    let choice = p.ask_or_empty("Open link number (blank to skip)")?;
    if choice.is_empty() {
        return Ok(());
    }

    let link = match choice.parse::<usize>() {
        Ok(number) => s.advisor.link_at(number),
        Err(_) => s.advisor.link(&choice),
    };
    match link {
        Ok(link) => {
            if let Err(e) = webbrowser::open(&link.url) {
                eprintln!("Error opening browser: {e}");
            }
        }
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

fn hospitals<R: BufRead>(s: &mut Session, p: &mut Prompt<R>) -> anyhow::Result<()> {
    let coordinates = (
        p.ask_or_empty("Latitude")?.parse::<f64>(),
        p.ask_or_empty("Longitude")?.parse::<f64>(),
    );
    let (Ok(lat), Ok(lon)) = coordinates else {
        println!("Error: latitude and longitude must be numbers");
        return Ok(());
    };
    let specialty = p.ask_or_empty("Specialty (blank for any)")?;
    let specialty = (!specialty.is_empty()).then_some(specialty.as_str());

    match s.advisor.nearest_hospitals(lat, lon, specialty, 5) {
        Ok(nearby) if nearby.is_empty() => println!("No matching hospitals found."),
        Ok(nearby) => {
            for n in nearby {
                let h = &n.hospital;
                println!(
                    "- {} ({:.1} km): {}, {} | {} | {}",
                    h.name,
                    n.distance_km,
                    h.address,
                    h.city,
                    h.contact,
                    h.specialties.join(", ")
                );
            }
        }
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
