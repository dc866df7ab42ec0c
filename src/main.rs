use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use toml::Table;

use lockstep::pipe::config::CoreConfig;
use lockstep::sim::config::{Config, SimConfig};
use lockstep::sim::top::Sim;
use lockstep::sim::workload::WorkloadConfig;

#[derive(Parser)]
#[command(version, about)]
struct LockstepArgs {
    #[arg(help = "Path to config.toml")]
    config_path: Option<PathBuf>,
    #[arg(long, help = "Override number of cores")]
    num_cores: Option<usize>,
    #[arg(long, help = "Override execute width")]
    exec_width: Option<u64>,
    #[arg(long, help = "Override number of instructions per core")]
    instructions: Option<u64>,
    #[arg(long, help = "Override workload seed")]
    seed: Option<u64>,
    #[arg(long, help = "Override cycle timeout")]
    timeout: Option<u64>,
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let argv = LockstepArgs::parse();
    let config_table: Table = match &argv.config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw).context("cannot parse config toml")?
        }
        None => Table::new(),
    };

    let mut sim_config = SimConfig::from_section(config_table.get("sim"));
    let mut core_config = CoreConfig::from_section(config_table.get("core"));
    let mut workload_config = WorkloadConfig::from_section(config_table.get("workload"));

    // override toml configs with argv
    sim_config.num_cores = argv.num_cores.unwrap_or(sim_config.num_cores);
    sim_config.timeout = argv.timeout.unwrap_or(sim_config.timeout);
    core_config.exec_width = argv.exec_width.unwrap_or(core_config.exec_width);
    workload_config.num_instructions = argv
        .instructions
        .unwrap_or(workload_config.num_instructions);
    workload_config.num_regs = core_config.num_regs;

    core_config.validate()?;
    workload_config.validate()?;

    let stats_path = sim_config.stats_path.clone();
    let mut sim = Sim::new(sim_config, core_config, workload_config);
    let summary = sim.run()?;

    println!(
        "retired {} instructions over {} cores in {} cycles (aggregate IPC {:.4})",
        summary.total.instructions,
        summary.total.num_cores,
        summary.total.cycles,
        summary.total.ipc
    );
    if let Some(path) = stats_path {
        summary.write_json(PathBuf::from(path).as_path())?;
    }
    Ok(())
}
