use std::error::Error;
use std::fs::File;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use log::info;

use dfamin_dfa::Dfa;
use dfamin_io::io_dfa::read_dfa;
use dfamin_io::io_dfa::write_dfa;
use dfamin_io::io_jff::read_jff;
use dfamin_io::io_jff::write_jff;
use dfamin_reduction::is_isomorphic;
use dfamin_reduction::language_equivalent_up_to;
use dfamin_reduction::minimize_with_observer;
use dfamin_reduction::Algorithm;
use dfamin_utilities::Timing;

/// The maximum length of the words that are compared by --verify.
const VERIFY_WORD_LENGTH: usize = 8;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Minimization {
    Naive,
    Moore,
    Hopcroft,
}

impl From<Minimization> for Algorithm {
    fn from(value: Minimization) -> Self {
        match value {
            Minimization::Naive => Algorithm::Naive,
            Minimization::Moore => Algorithm::Moore,
            Minimization::Hopcroft => Algorithm::Hopcroft,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(name = "Maurice Laveaux", about = "A deterministic finite automaton minimization tool")]
struct Cli {
    algorithm: Minimization,

    /// The input automaton, in the JFLAP format when it ends with .jff and in
    /// the .dfa format otherwise.
    #[arg(value_name = "FILE")]
    filename: String,

    /// Where to write the minimized automaton, in the format of the input when omitted.
    output: Option<String>,

    /// Print the time spent in every phase.
    #[arg(long)]
    time: bool,

    /// Check that all algorithms produce the same minimal automaton.
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();

    let mut timing = Timing::new();

    let mut read_time = timing.start("read");
    let file = File::open(&cli.filename)?;
    let dfa = if is_jff(&cli.filename) {
        read_jff(file)
    } else {
        read_dfa(file)
    }
    .map_err(|error| anyhow!("Failed to read {}: {error}", cli.filename))?;
    read_time.finish();
    info!("Read {dfa}");

    let mut minimize_time = timing.start("minimize");
    let mut block_counts: Vec<usize> = Vec::new();
    let result = minimize_with_observer(&dfa, cli.algorithm.into(), &mut block_counts)?;
    minimize_time.finish();
    info!(
        "Minimized to {result} in {} refinement steps",
        block_counts.len().saturating_sub(1)
    );

    if cli.verify {
        let mut verify_time = timing.start("verify");
        verify(&dfa, &result)?;
        verify_time.finish();
    }

    let mut write_time = timing.start("write");
    if let Some(file) = cli.output {
        let mut writer = BufWriter::new(File::create(&file)?);
        write(&mut writer, &result, is_jff(&file))
            .map_err(|error| anyhow!("Failed to write {file}: {error}"))?;
    } else {
        write(&mut stdout(), &result, is_jff(&cli.filename))
            .map_err(|error| anyhow!("Failed to write the result: {error}"))?;
    }
    write_time.finish();

    if cli.time {
        timing.print()?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Returns true iff the file has the .jff extension of JFLAP.
fn is_jff(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("jff"))
}

fn write(writer: &mut impl Write, dfa: &Dfa, jff: bool) -> Result<(), Box<dyn Error>> {
    if jff {
        write_jff(writer, dfa)
    } else {
        write_dfa(writer, dfa)
    }
}

/// Checks the result against the other algorithms and the original automaton.
fn verify(dfa: &Dfa, result: &Dfa) -> Result<()> {
    for algorithm in Algorithm::ALL {
        let other = minimize_with_observer(dfa, algorithm, &mut ())?;

        if !is_isomorphic(result, &other)? {
            bail!(
                "The {algorithm} algorithm computed a different automaton with {} states",
                other.num_of_states()
            );
        }
    }

    if !language_equivalent_up_to(dfa, result, VERIFY_WORD_LENGTH)? {
        bail!(
            "The minimized automaton does not accept the same words up to length \
             {VERIFY_WORD_LENGTH}"
        );
    }

    info!("Verified the result against all algorithms");
    Ok(())
}
