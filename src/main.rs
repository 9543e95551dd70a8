use clap::Parser;
use epub_meta::{
    EpubError, ExtractOptions, MetadataRecord, Result, get_metadata_with_options,
    get_package_document_bytes,
};
use log::{debug, error};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// 📚 epub-meta - EPUB元数据提取工具
#[derive(Parser)]
#[command(name = "epub-meta")]
#[command(about = "提取EPUB文件的书目元数据、封面和目录，以YAML格式输出")]
#[command(version)]
struct Args {
    /// EPUB文件路径
    #[arg(help = "要处理的EPUB文件路径")]
    epub_file: PathBuf,

    /// 读取封面图片
    #[arg(long, help = "读取封面图片并以base64输出")]
    cover: bool,

    /// 不提取目录
    #[arg(long, help = "不提取目录")]
    no_toc: bool,

    /// 输出包文件原文
    #[arg(long, help = "输出包文件（OPF）的原始内容，而不是元数据")]
    opf: bool,

    /// 提取选项配置文件
    #[arg(short, long, value_name = "FILE", help = "YAML格式的提取选项文件")]
    config: Option<PathBuf>,

    /// 详细输出模式
    #[arg(short, long, help = "显示详细日志")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ 错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 日志输出到stderr，默认只显示警告；RUST_LOG优先
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if args.opf {
        let bytes = get_package_document_bytes(&args.epub_file)?;
        stdout.write_all(&bytes)?;
        return Ok(());
    }

    let options = build_options(args)?;
    debug!("提取选项: {:?}", options);

    let record = get_metadata_with_options(&args.epub_file, &options)?;
    stdout.write_all(render_yaml(&record)?.as_bytes())?;
    Ok(())
}

fn render_yaml(record: &MetadataRecord) -> Result<String> {
    serde_yml::to_string(record).map_err(|e| EpubError::SerializeError(e.to_string()))
}

/// 合并配置文件与命令行开关
///
/// 命令行默认不读取封面；`--cover` 与 `--no-toc` 覆盖配置文件中的设置。
fn build_options(args: &Args) -> Result<ExtractOptions> {
    let mut options = match &args.config {
        Some(path) => ExtractOptions::from_file(path)?,
        None => ExtractOptions {
            read_cover_image: false,
            ..ExtractOptions::default()
        },
    };

    if args.cover {
        options.read_cover_image = true;
    }
    if args.no_toc {
        options.read_toc = false;
    }
    Ok(options)
}
