#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use secret_santa::{
    config::{EventConfig, DEFAULT_CONFIG_PATH},
    io,
    model::{PairingSet, Participant},
    notification::{prepare_message, SmtpMailer, SmtpSecurity, SmtpSettings},
    pairing::{has_valid_pairing, PairingError, PairingGenerator, DEFAULT_MAX_ATTEMPTS},
    presenter::PairingPresenter,
    runner::{EmailRunner, RunMode},
    storage::{FileRecorder, DEFAULT_PAIRINGS_DIR},
    template::MessageTemplate,
};
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Tirage Secret Santa avec exclusions
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier YAML de l'événement
    #[arg(long, global = true, env = "SANTA_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Répertoire de l'historique des tirages
    #[arg(long, global = true, env = "PAIRINGS_DIR", default_value = DEFAULT_PAIRINGS_DIR)]
    pairings_dir: PathBuf,

    /// Désactive les couleurs ANSI
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Graine pour un tirage reproductible
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,
    /// Participants depuis un CSV `name,email[,exclude]` au lieu du YAML
    #[arg(long)]
    import_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SmtpArgs {
    /// Serveur SMTP (requis en mode live)
    #[arg(long, env = "EMAIL_SMTP_ADDRESS")]
    smtp_host: Option<String>,
    /// Par défaut : 465 (tls), 587 (starttls), 25 (none)
    #[arg(long, env = "EMAIL_SMTP_PORT")]
    smtp_port: Option<u16>,
    #[arg(long, env = "EMAIL_DOMAIN")]
    smtp_domain: Option<String>,
    #[arg(long, env = "EMAIL_USERNAME", default_value = "")]
    smtp_username: String,
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true, default_value = "")]
    smtp_password: String,
    /// tls | starttls | none
    #[arg(long, env = "EMAIL_ENABLE_SSL", default_value = "tls")]
    smtp_security: SmtpSecurity,
    /// Expéditeur (par défaut : l'identifiant SMTP)
    #[arg(long, env = "EMAIL_FROM")]
    from: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tirer au sort, puis afficher (dry-run) ou envoyer (live)
    Draw {
        #[command(flatten)]
        draw: DrawArgs,
        /// Envoie réellement les emails
        #[arg(long, env = "DOITLIVE")]
        live: bool,
        /// Pause entre deux envois, en secondes
        #[arg(long, default_value_t = 3)]
        pacing_secs: u64,
        #[arg(long)]
        out_json: Option<PathBuf>,
        #[arg(long)]
        out_csv: Option<PathBuf>,
        #[command(flatten)]
        smtp: SmtpArgs,
    },

    /// Vérifier qu'un tirage valide existe
    Check {
        #[arg(long)]
        import_csv: Option<PathBuf>,
    },

    /// Afficher le message qu'un participant recevrait (aucun envoi)
    Preview {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        draw: DrawArgs,
    },

    /// Statistiques de tentatives sur plusieurs tirages
    Stats {
        #[arg(long, default_value_t = 1000)]
        runs: usize,
        #[command(flatten)]
        draw: DrawArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let color = !cli.no_color;

    let code = match cli.cmd {
        Commands::Draw {
            draw,
            live,
            pacing_secs,
            out_json,
            out_csv,
            smtp,
        } => {
            let config = load_config(&cli.config, draw.import_csv.as_deref())?;
            let (pairings, attempts) =
                draw_once(config.participants().to_vec(), draw.seed, draw.max_attempts)?;

            match RunMode::from_flag(live) {
                RunMode::DryRun => {
                    PairingPresenter::new(color).display(
                        &mut std::io::stdout().lock(),
                        &pairings,
                        attempts,
                    )?;
                }
                RunMode::Live => {
                    let settings = smtp_settings(&smtp)?;
                    let sender = smtp
                        .from
                        .clone()
                        .unwrap_or_else(|| settings.username.clone());
                    let mailer = SmtpMailer::new(&settings)?;
                    let recorder = FileRecorder::new(&cli.pairings_dir);
                    EmailRunner::new(config.event(), sender, &mailer, &recorder)
                        .with_renderer(load_template(&config)?)
                        .with_pacing(std::time::Duration::from_secs(pacing_secs))
                        .with_color(color)
                        .run(&mut std::io::stdout().lock(), &pairings)?;
                }
            }

            if let Some(path) = out_json {
                io::export_pairings_json(path, &pairings)?;
            }
            if let Some(path) = out_csv {
                io::export_pairings_csv(path, &pairings)?;
            }
            0
        }
        Commands::Check { import_csv } => {
            let config = load_config(&cli.config, import_csv.as_deref())?;
            if has_valid_pairing(config.participants()) {
                println!(
                    "OK: a valid pairing exists for {} participant(s)",
                    config.participants().len()
                );
                0
            } else {
                eprintln!("No valid pairing exists: exclusions are infeasible");
                // Code 2 = contraintes infaisables
                2
            }
        }
        Commands::Preview { name, draw } => {
            let config = load_config(&cli.config, draw.import_csv.as_deref())?;
            let (pairings, _) =
                draw_once(config.participants().to_vec(), draw.seed, draw.max_attempts)?;
            let Some(assignment) = pairings.iter().find(|a| a.giver.name() == name) else {
                bail!("unknown participant: {name}");
            };
            let template = load_template(&config)?;
            let message = prepare_message(
                assignment,
                &config.event(),
                &config.organizer.email,
                &template,
            );
            println!("To: {} <{}>", message.to_name, message.to);
            println!("Subject: {}", message.subject);
            println!();
            print!("{}", message.body);
            0
        }
        Commands::Stats { runs, draw } => {
            if runs == 0 {
                bail!("runs must be > 0");
            }
            let config = load_config(&cli.config, draw.import_csv.as_deref())?;
            let mut attempts = match draw.seed {
                Some(seed) => collect_attempts(
                    PairingGenerator::seeded(config.participants().to_vec(), seed)?
                        .with_max_attempts(draw.max_attempts),
                    runs,
                )?,
                None => collect_attempts(
                    PairingGenerator::new(config.participants().to_vec())?
                        .with_max_attempts(draw.max_attempts),
                    runs,
                )?,
            };
            attempts.sort_unstable();
            let median = attempts[(attempts.len() - 1) / 2];
            let average = attempts.iter().sum::<u64>() as f64 / attempts.len() as f64;
            println!("Runs: {runs}");
            println!("Median: {median}");
            println!("Average: {average:.2}");
            0
        }
    };

    std::process::exit(code);
}

fn load_config(path: &Path, import_csv: Option<&Path>) -> Result<EventConfig> {
    let mut config = EventConfig::load(path)?;
    if let Some(csv) = import_csv {
        let people = io::import_participants_csv(csv)?;
        config
            .set_participants(people)
            .with_context(|| format!("participants from {}", csv.display()))?;
    }
    Ok(config)
}

fn load_template(config: &EventConfig) -> Result<MessageTemplate> {
    match config.template_path() {
        Some(path) => MessageTemplate::from_file(path),
        None => Ok(MessageTemplate::default()),
    }
}

fn draw_once(
    participants: Vec<Participant>,
    seed: Option<u64>,
    max_attempts: u64,
) -> Result<(PairingSet, u64), PairingError> {
    match seed {
        Some(seed) => {
            generate(PairingGenerator::seeded(participants, seed)?.with_max_attempts(max_attempts))
        }
        None => generate(PairingGenerator::new(participants)?.with_max_attempts(max_attempts)),
    }
}

fn generate<R: Rng>(mut generator: PairingGenerator<R>) -> Result<(PairingSet, u64), PairingError> {
    let pairings = generator.generate()?;
    Ok((pairings, generator.attempts()))
}

fn collect_attempts<R: Rng>(mut generator: PairingGenerator<R>, runs: usize) -> Result<Vec<u64>> {
    let mut out = Vec::with_capacity(runs);
    for _ in 0..runs {
        generator.generate()?;
        out.push(generator.attempts());
    }
    Ok(out)
}

fn smtp_settings(args: &SmtpArgs) -> Result<SmtpSettings> {
    let Some(host) = args.smtp_host.clone() else {
        bail!("live mode requires --smtp-host (or EMAIL_SMTP_ADDRESS)");
    };
    Ok(SmtpSettings {
        host,
        port: args
            .smtp_port
            .unwrap_or_else(|| args.smtp_security.default_port()),
        domain: args.smtp_domain.clone(),
        username: args.smtp_username.clone(),
        password: args.smtp_password.clone(),
        security: args.smtp_security,
    })
}
