use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use enigma_core::config;
use enigma_core::keygen::random_iteration;
use enigma_core::{
    Configuration, EnigmaMachine, KeygenOptions, ReflectorKind, generate_configuration, validate,
};
use env_logger::Env;
use log::{LevelFilter, debug, info};
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const RANDOM_START_BOUND: u32 = 1 << 20;

#[derive(Parser)]
#[command(
    name = "enigma",
    author,
    version,
    about = "Rotor cipher machine over a custom alphabet (toy cipher)"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReflectorArg {
    Identity,
    Mirror,
}

impl From<ReflectorArg> for ReflectorKind {
    fn from(arg: ReflectorArg) -> Self {
        match arg {
            ReflectorArg::Identity => ReflectorKind::Identity,
            ReflectorArg::Mirror => ReflectorKind::Mirror,
        }
    }
}

#[derive(clap::Args)]
struct CipherArgs {
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    #[arg(long, value_name = "TEXT")]
    message: Option<String>,
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Override the configured starting iteration.
    #[arg(long, value_name = "N")]
    iteration: Option<i64>,
    /// Copy symbols outside the alphabet verbatim instead of failing.
    #[arg(long)]
    passthrough: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a configuration file without processing anything.
    Validate {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
    },
    /// Encode text with the machine described by a configuration file.
    Encode(CipherArgs),
    /// Decode text; identical to `encode` on a freshly built machine.
    Decode(CipherArgs),
    /// Generate a random configuration and write it to disk.
    Keygen {
        #[arg(long, default_value = DEFAULT_ALPHABET)]
        alphabet: String,
        #[arg(long, default_value_t = 3)]
        rotors: usize,
        #[arg(long, default_value_t = 0)]
        plugs: usize,
        #[arg(long, default_value_t = 2)]
        cycle_len: usize,
        #[arg(long, default_value_t = 0)]
        rotation_factor: u64,
        #[arg(long, value_enum, default_value = "mirror")]
        reflector: ReflectorArg,
        /// Seed a deterministic generator instead of the OS RNG.
        #[arg(long, value_name = "N")]
        rng_seed: Option<u64>,
        /// Draw a random starting iteration instead of 0.
        #[arg(long)]
        random_start: bool,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Round-trip a message through a freshly generated configuration.
    Demo {
        #[arg(long, default_value = "ATTACKATDAWN")]
        message: String,
        #[arg(long, default_value_t = 3)]
        rotors: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    match cli.command {
        Commands::Validate { config } => cmd_validate(config),
        Commands::Encode(args) => cmd_cipher("Encoded", args),
        Commands::Decode(args) => cmd_cipher("Decoded", args),
        Commands::Keygen {
            alphabet,
            rotors,
            plugs,
            cycle_len,
            rotation_factor,
            reflector,
            rng_seed,
            random_start,
            out,
        } => {
            let options = KeygenOptions {
                rotors,
                plug_cycles: plugs,
                cycle_len,
                rotation_factor,
                reflector: reflector.into(),
            };
            cmd_keygen(alphabet, options, rng_seed, random_start, out)
        }
        Commands::Demo { message, rotors } => cmd_demo(message, rotors),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn cmd_validate(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    validate(&config).with_context(|| format!("validating {}", config_path.display()))?;
    println!(
        "{}: ok ({} symbols, {} rotors, {} plug cycles)",
        config_path.display(),
        config.alphabet.len(),
        config.rotor_sequence.len(),
        config.plugboard_cycles.len()
    );
    println!("Fingerprint: {}", config.fingerprint());
    Ok(())
}

fn cmd_cipher(verb: &str, args: CipherArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(iteration) = args.iteration {
        config.iteration = iteration;
    }
    let mut machine = EnigmaMachine::new(&config)
        .with_context(|| format!("building machine from {}", args.config.display()))?;
    let text = resolve_text(args.message, args.input)?;
    debug!(
        "{} {} symbols fingerprint={} start={:?}",
        verb.to_lowercase(),
        text.chars().count(),
        config.fingerprint(),
        machine.state()
    );
    let output = if args.passthrough {
        run_passthrough(&mut machine, &text)?
    } else {
        machine.process_str(&text)?
    };
    debug!(
        "finished at {}",
        serde_json::to_string(&machine.state()).context("serializing machine state")?
    );
    match args.out {
        Some(path) => {
            fs::write(&path, &output)
                .with_context(|| format!("writing output to {}", path.display()))?;
            println!(
                "{} {} symbols and wrote them to {}",
                verb,
                output.chars().count(),
                path.display()
            );
        }
        None => println!("{output}"),
    }
    Ok(())
}

fn run_passthrough(machine: &mut EnigmaMachine, text: &str) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut skipped = 0usize;
    for symbol in text.chars() {
        if machine.alphabet().contains(symbol) {
            output.push(machine.process(symbol)?);
        } else {
            skipped += 1;
            output.push(symbol);
        }
    }
    if skipped > 0 {
        info!("copied {skipped} symbols outside the alphabet unchanged");
    }
    Ok(output)
}

fn cmd_keygen(
    alphabet: String,
    options: KeygenOptions,
    rng_seed: Option<u64>,
    random_start: bool,
    out: PathBuf,
) -> Result<()> {
    let symbols: Vec<char> = alphabet.chars().collect();
    let mut rng: Box<dyn RngCore> = match rng_seed {
        Some(seed) => Box::new(ChaCha20Rng::seed_from_u64(seed)),
        None => Box::new(OsRng),
    };
    let mut config = generate_configuration(&symbols, &options, rng.as_mut())
        .context("generating configuration")?;
    if random_start {
        let mut start_rng = ChaCha20Rng::seed_from_u64(rng.next_u64());
        config.iteration = random_iteration(&mut start_rng, RANDOM_START_BOUND);
    }
    validate(&config).context("generated configuration failed validation")?;
    save_config(&out, &config)?;
    println!("Wrote configuration to {}", out.display());
    println!("Rotor order: {}", config.rotor_sequence.join(">"));
    println!("Fingerprint: {}", config.fingerprint());
    Ok(())
}

fn cmd_demo(message: String, rotors: usize) -> Result<()> {
    let options = KeygenOptions {
        rotors,
        plug_cycles: 4,
        ..KeygenOptions::default()
    };
    let symbols: Vec<char> = DEFAULT_ALPHABET.chars().collect();
    let config = generate_configuration(&symbols, &options, &mut OsRng)?;
    let mut encoder = EnigmaMachine::new(&config)?;
    let mut decoder = EnigmaMachine::new(&config)?;
    let ciphertext = encoder.process_str(&message)?;
    let recovered = decoder.process_str(&ciphertext)?;
    println!("Rotor order: {}", config.rotor_sequence.join(">"));
    println!("Plug cycles: {:?}", config.plugboard_cycles);
    println!("Plaintext:   {message}");
    println!("Ciphertext:  {ciphertext}");
    println!("Recovered:   {recovered}");
    if recovered != message {
        bail!("demo round trip diverged");
    }
    Ok(())
}

fn resolve_text(message: Option<String>, input: Option<PathBuf>) -> Result<String> {
    match (message, input) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("reading input from {}", path.display())),
        (Some(_), Some(_)) => bail!("Provide either --message or --input, not both."),
        (None, None) => bail!("Provide --message TEXT or --input FILE for data to process."),
    }
}

fn load_config(path: &Path) -> Result<Configuration> {
    config::load(path).with_context(|| format!("loading configuration from {}", path.display()))
}

fn save_config(path: &Path, value: &Configuration) -> Result<()> {
    config::save(path, value)
        .with_context(|| format!("writing configuration to {}", path.display()))
}
