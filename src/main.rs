//! Reverso Context 命令行查询工具
//!
//! 查询指定语言对的词典翻译和上下文例句，例句中服务端高亮的
//! 命中部分用*字符标出。

// 第三方crate导入
use anyhow::Result;
use clap::Parser;
use futures::{pin_mut, StreamExt};
use tracing::{error, info};

// 本地模块导入
use reverso_api::context::ReversoContextClient;
use reverso_api::utils::{highlight_with_markers, init_logging};

/// CLI参数结构
#[derive(Parser)]
#[command(author, version, about = "Reverso Context 上下文翻译查询工具", long_about = None)]
struct Cli {
    /// 要查询的源文本（词或短语）
    #[arg(short, long, value_name = "TEXT")]
    source_text: String,

    /// 目标文本（可选，用于过滤目标侧例句）
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    target_text: String,

    /// 源语言代码 (如: en, ru, de)
    #[arg(long, default_value = "en")]
    from: String,

    /// 目标语言代码 (如: en, ru, de)
    #[arg(long, default_value = "ru")]
    to: String,

    /// 最多展示的例句数量
    #[arg(long, default_value = "10")]
    max_examples: usize,

    /// 跳过词典翻译部分
    #[arg(long)]
    no_translations: bool,

    /// 详细输出模式
    #[arg(short, long)]
    verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli).await {
        error!("❌ 查询失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 查询核心流程：词典翻译在前，上下文例句在后
async fn run(cli: &Cli) -> Result<()> {
    if !cli.quiet {
        info!("🚀 初始化Reverso Context客户端");
        info!("🔍 查询: {} [{} -> {}]", cli.source_text, cli.from, cli.to);
    }

    let mut client =
        ReversoContextClient::new(&cli.source_text, &cli.target_text, &cli.from, &cli.to).await?;

    if cli.verbose {
        info!(
            "🌐 支持的语言: 源 {} 种 / 目标 {} 种",
            client.supported_languages().source_codes().len(),
            client.supported_languages().target_codes().len()
        );
    }

    if !cli.no_translations {
        let translations = client.get_translations().await?;
        if !cli.quiet {
            info!("📚 词典翻译: {} 条", translations.len());
        }
        for translation in &translations {
            println!("{} == {}", translation.source_word, translation.translation);
            println!("  频率: {}", translation.frequency);
            println!(
                "  词性: {}",
                translation.part_of_speech.as_deref().unwrap_or("未知")
            );
            if !translation.inflected_forms.is_empty() {
                println!(
                    "  变形: {}",
                    translation
                        .inflected_forms
                        .iter()
                        .map(|form| form.term.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            println!();
        }
    }

    let total_pages = client.total_pages().await?;
    if !cli.quiet {
        info!(
            "📖 共 {} 页例句，最多展示 {} 条",
            total_pages, cli.max_examples
        );
    }

    // 惰性消费：达到展示上限后停止，不再请求后续页
    let stream = client.get_examples().await?;
    pin_mut!(stream);
    let mut shown = 0usize;
    while shown < cli.max_examples {
        let Some(pair) = stream.next().await else {
            break;
        };
        let (source, target) = pair?;
        println!(
            "{} == {}",
            highlight_with_markers(&source.text, &source.highlighted),
            highlight_with_markers(&target.text, &target.highlighted)
        );
        shown += 1;
    }

    if !cli.quiet {
        info!("✅ 查询完成，共展示 {} 条例句", shown);
    }
    Ok(())
}
