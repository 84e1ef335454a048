use clap::Parser;

use script_hide::{
    cli::{Cli, Commands, ImageCommands, PdfCommands},
    handler::{
        handle_image_capacity, handle_image_decode, handle_image_encode, handle_pdf_embed,
        handle_pdf_extract,
    },
};

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令将执行分派到相应的处理函数。
/// 任何错误都会打印出来，并以非零状态码退出。
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Image(ImageCommands::Encode(args)) => handle_image_encode(args),
        Commands::Image(ImageCommands::Decode(args)) => handle_image_decode(args),
        Commands::Image(ImageCommands::Capacity(args)) => handle_image_capacity(args),
        Commands::Pdf(PdfCommands::Embed(args)) => handle_pdf_embed(args),
        Commands::Pdf(PdfCommands::Extract(args)) => handle_pdf_extract(args),
    }
}
