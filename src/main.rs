use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use gocat::lexer::{format_tokens, tokenize};
use gocat::{remove_inputs, CatOptions, GocatError, MergedUnit, Merger};

#[derive(Parser)]
#[command(name = "gocat")]
#[command(author, version, about = "Combine Go source files into a single file", long_about = None)]
struct Cli {
    /// Package name to use in the output file
    #[arg(short = 'p', value_name = "PKGNAME", default_value = "")]
    package_name: String,

    /// Prefix to add to all top-level names
    #[arg(short = 'x', value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Ignore comments
    #[arg(short = 'c')]
    no_comments: bool,

    /// Ignore test files
    #[arg(short = 'n')]
    no_tests: bool,

    /// Delete the concatenated files from disk after a successful merge
    #[arg(short = 'k')]
    kill: bool,

    /// Output file (standard output when omitted)
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump the merged syntax tree as JSON to stderr
    #[arg(long)]
    dump_ast: bool,

    /// Dump the tokens of each input file to stderr
    #[arg(long)]
    dump_tokens: bool,

    /// Go source files to combine
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // 標準出力は結合結果に使うので、ログは標準エラー出力へ
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.dump_tokens {
        dump_tokens(&cli.files)?;
    }

    let options = CatOptions::new(&cli.package_name, &cli.prefix, cli.no_comments, cli.no_tests);
    let mut merger = Merger::new(options);

    let unit = match merger.merge_paths(&cli.files) {
        Ok(unit) => unit,
        Err(error @ GocatError::Parse { .. }) => {
            merger.report_error(&error)?;
            anyhow::bail!("構文解析に失敗しました");
        }
        Err(error) => return Err(error.into()),
    };

    if cli.dump_ast {
        eprintln!("{}", serde_json::to_string_pretty(&unit)?);
    }

    write_output(&unit, cli.output.as_deref())?;

    if cli.kill {
        remove_inputs(&deletable_inputs(&unit, cli.output.as_deref()))?;
    }
    Ok(())
}

fn dump_tokens(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("{} を読み込めません", path.display()))?;
        let lexed = tokenize(&source).with_context(|| format!("{}", path.display()))?;
        eprintln!("{}", format!("=== {} ===", path.display()).blue().bold());
        eprintln!("{}", format_tokens(&lexed.tokens));
    }
    Ok(())
}

/// 出力先が決まってから書き出す。ファイルへは一時ファイル経由で書き、
/// 失敗したときに中途半端なファイルを残さない
fn write_output(unit: &MergedUnit, output: Option<&Path>) -> Result<()> {
    match output {
        None => {
            let stdout = io::stdout();
            unit.emit(&mut stdout.lock())?;
        }
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let mut temp = NamedTempFile::new_in(dir)
                .with_context(|| format!("{} に一時ファイルを作成できません", dir.display()))?;
            unit.emit(&mut temp)?;
            temp.persist(path)
                .with_context(|| format!("{} に書き込めません", path.display()))?;
            log::info!("{} に出力", path.display());
        }
    }
    Ok(())
}

/// 削除する入力ファイル。出力先と同じファイルは消さない
fn deletable_inputs(unit: &MergedUnit, output: Option<&Path>) -> Vec<PathBuf> {
    let output = output.and_then(|path| path.canonicalize().ok());
    unit.inputs
        .iter()
        .filter(|path| output.is_none() || path.canonicalize().ok() != output)
        .cloned()
        .collect()
}
