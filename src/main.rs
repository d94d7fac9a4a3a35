use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use git_hunks::view::{ContextSize, DiffMode, DiffRequest};
use git_hunks::{DiffView, Git, GitHunksError, Goto, Span, StageOutcome, parse_selection};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-hunks")]
#[command(about = "Hunk-granular git staging tool")]
struct Cli {
    /// Run as if git was started in this directory
    #[arg(short = 'C', global = true, default_value = ".")]
    repo: PathBuf,

    /// Lines of context around each hunk (minimum 1)
    #[arg(
        short = 'U',
        long,
        global = true,
        env = "GIT_HUNKS_UNIFIED",
        default_value_t = ContextSize::DEFAULT.get()
    )]
    unified: u32,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DiffArgs {
    /// Diff the index against HEAD instead of the working tree
    #[arg(long)]
    cached: bool,

    /// Compare against this commit instead
    #[arg(long)]
    object: Option<String>,

    /// Restrict the diff to one path
    path: Option<String>,
}

#[derive(Args)]
struct SelectArgs {
    /// Selection: a byte offset (e.g. "120") or range (e.g. "120..180")
    #[arg(long = "at", value_parser = parse_selection)]
    at: Vec<Span>,

    /// Select a hunk by its ordinal in `hunks` output
    #[arg(long = "hunk")]
    hunk: Vec<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the diff, or a message when there is nothing to show
    Show {
        #[command(flatten)]
        diff: DiffArgs,
    },
    /// List hunks with their ordinal, file, byte span and header
    Hunks {
        #[command(flatten)]
        diff: DiffArgs,
    },
    /// Print the offset a movement lands on (e.g. "hunk:next", "file:2")
    Goto {
        goto: Goto,
        /// Cursor offset to move from
        #[arg(long, default_value_t = 0)]
        from: usize,
        #[command(flatten)]
        diff: DiffArgs,
    },
    /// Print the patch for a selection without applying it
    Patch {
        #[command(flatten)]
        select: SelectArgs,
        #[command(flatten)]
        diff: DiffArgs,
    },
    /// Stage the hunks under a selection
    Stage {
        #[command(flatten)]
        select: SelectArgs,
        /// Restrict the diff to one path
        path: Option<String>,
    },
    /// Unstage the hunks under a selection
    Unstage {
        #[command(flatten)]
        select: SelectArgs,
        /// Restrict the diff to one path
        path: Option<String>,
    },
    /// Generate shell completions
    Completions { shell: Shell },
    /// Generate a man page
    Manpage,
}

impl Cli {
    fn request(&self, mode: DiffMode, path: Option<String>, object: Option<String>) -> DiffRequest {
        DiffRequest {
            mode,
            unified: ContextSize::new(self.unified),
            path,
            object,
        }
    }

    fn diff_request(&self, diff: &DiffArgs) -> DiffRequest {
        let mode = if diff.cached {
            DiffMode::Cached
        } else {
            DiffMode::Worktree
        };
        self.request(mode, diff.path.clone(), diff.object.clone())
    }
}

/// Spans for `--at` selections plus the start of every `--hunk` ordinal.
fn selection(view: &DiffView, select: &SelectArgs) -> Result<Vec<Span>, GitHunksError> {
    let lookup = view.lookup();
    let mut spans = select.at.clone();
    for &index in &select.hunk {
        let entry = lookup.get(index).ok_or(GitHunksError::NoSuchHunk {
            index,
            count: lookup.len(),
        })?;
        spans.push(Span::point(entry.hunk.start()));
    }
    Ok(spans)
}

fn print_hunks(view: &DiffView) {
    let text = view.text();
    for (index, entry) in view.lookup().iter().enumerate() {
        let path = entry.file.path(text).unwrap_or("?");
        let marker = text
            .lines_in(entry.hunk.span)
            .first()
            .map_or("", |line| text.line_text(line));
        println!(
            "{index}\t{path}\t{}..{}\t{marker}",
            entry.hunk.start(),
            entry.hunk.end()
        );
    }
}

fn apply(git: &Git, request: DiffRequest, select: &SelectArgs) -> Result<(), GitHunksError> {
    let mut view = DiffView::open(git, request)?;
    if view.is_clean() {
        println!("{}", view.contents());
        return Ok(());
    }

    let spans = selection(&view, select)?;
    let outcome = if view.mode().is_cached() {
        view.unstage(git, git, &spans)?
    } else {
        view.stage(git, git, &spans)?
    };

    match outcome {
        StageOutcome::NothingToDo => eprintln!("No hunks selected"),
        StageOutcome::Applied { hunks, .. } => {
            let verb = if view.mode().is_cached() { "Unstaged" } else { "Staged" };
            eprintln!("{verb} {hunks} hunk(s)");
        }
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<(), GitHunksError> {
    let git = Git::new(&cli.repo);

    match &cli.command {
        Commands::Show { diff } => {
            let view = DiffView::open(&git, cli.diff_request(diff))?;
            print!("{}", view.contents());
            if view.is_clean() {
                println!();
            }
        }
        Commands::Hunks { diff } => {
            let view = DiffView::open(&git, cli.diff_request(diff))?;
            if view.is_clean() {
                println!("{}", view.contents());
            } else {
                print_hunks(&view);
            }
        }
        Commands::Goto { goto, from, diff } => {
            let view = DiffView::open(&git, cli.diff_request(diff))?;
            match view.goto(*from, *goto) {
                Some(offset) => println!("{offset}"),
                None => println!("{from}"),
            }
        }
        Commands::Patch { select, diff } => {
            let view = DiffView::open(&git, cli.diff_request(diff))?;
            if let Some(patch) = view.patch_for(&selection(&view, select)?) {
                print!("{patch}");
            }
        }
        Commands::Stage { select, path } => {
            apply(&git, cli.request(DiffMode::Worktree, path.clone(), None), select)?;
        }
        Commands::Unstage { select, path } => {
            apply(&git, cli.request(DiffMode::Cached, path.clone(), None), select)?;
        }
        Commands::Completions { .. } | Commands::Manpage => {}
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Err(err) = git_hunks::log::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {err}");
    }

    match &cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "git-hunks", &mut io::stdout());
        }
        Commands::Manpage => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
        _ => run(&cli)?,
    }

    Ok(())
}
