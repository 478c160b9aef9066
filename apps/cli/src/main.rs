//! # UMRR CAN Setup CLI
//!
//! smartmicro UMRR 雷达的 CAN 接口配置与驱动启动入口。
//!
//! ```bash
//! # 只配置接口（需要 root）
//! sudo umrr-can-setup setup
//!
//! # 只启动驱动（假定接口已配置好）
//! umrr-can-setup launch
//!
//! # 默认：配置、显示接口信息、询问后启动
//! sudo umrr-can-setup
//! ```

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use umrr_setup::{AdapterKind, LaunchConfig, SetupConfig, launch, link, privilege, prompt, slcan};

/// UMRR 雷达 CAN 接口配置工具
#[derive(Parser, Debug)]
#[command(name = "umrr-can-setup")]
#[command(about = "CAN interface setup and driver launch for smartmicro UMRR radars", long_about = None)]
#[command(version)]
struct Cli {
    /// 运行模式: setup | launch | all
    #[arg(default_value = "all")]
    mode: String,
}

/// 操作员模式，三个终态，无回转
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// 只配置接口
    Setup,
    /// 只启动驱动
    Launch,
    /// 配置 → 显示信息 → 询问 → 启动（默认）
    All,
}

fn parse_mode(arg: &str) -> Option<Mode> {
    match arg {
        "setup" => Some(Mode::Setup),
        "launch" => Some(Mode::Launch),
        "all" => Some(Mode::All),
        _ => None,
    }
}

// 未知模式按规约必须退出码 1，clap 自己的报错是 2，所以模式串手动匹配
fn print_usage() {
    eprintln!("Usage: umrr-can-setup [MODE]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  setup    configure the CAN interface only (requires root)");
    eprintln!("  launch   start the radar driver only");
    eprintln!("  all      configure, show interface info, prompt, then launch (default)");
}

/// 按适配器类型分派配置路径
fn run_setup(config: &SetupConfig) -> Result<()> {
    match config.adapter {
        AdapterKind::Native => link::setup_native(config)?,
        AdapterKind::SerialLine => slcan::setup_serial_line(config)?,
    }
    Ok(())
}

fn show_interface_info(config: &SetupConfig) {
    println!("CAN interface '{}' is configured at {} bit/s.", config.interface, config.bitrate);
    link::print_interface_details(&config.interface);
    println!("{}", link::teardown_hint(&config.interface));
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("umrr_setup=info".parse().unwrap())
                .add_directive("umrr_can_setup=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let Some(mode) = parse_mode(&cli.mode) else {
        warn!(mode = %cli.mode, "unrecognized mode");
        eprintln!("Unknown mode: '{}'", cli.mode);
        eprintln!();
        print_usage();
        process::exit(1);
    };

    // 配置构造一次，按引用传给各步骤
    let config = SetupConfig::default();
    let launch_config = LaunchConfig::default();

    match mode {
        Mode::Setup => {
            privilege::ensure_root()?;
            run_setup(&config)?;
            info!(interface = %config.interface, "setup-only mode complete");
            println!("CAN interface '{}' is ready.", config.interface);
        },

        Mode::Launch => {
            // 成功时进程被驱动替换，不会走到 Ok
            launch::launch_driver(&launch_config)?;
        },

        Mode::All => {
            privilege::ensure_root()?;
            run_setup(&config)?;
            show_interface_info(&config);

            let stdin = io::stdin();
            let answer = prompt::ask(
                "Start the radar driver now?",
                &mut stdin.lock(),
                &mut io::stdout(),
            )?;

            if answer.accepted() {
                launch::launch_driver(&launch_config)?;
            } else {
                println!("Driver launch skipped. Start it later with: umrr-can-setup launch");
                io::stdout().flush()?;
            }
        },
    }

    Ok(())
}
