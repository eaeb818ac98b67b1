//! Inventory command: list jobs and their reserved ports.

use anyhow::Result;
use clap::Args;
use nomad_run_reconcile::JobInfo;
use serde::Serialize;
use tabled::Tabled;

use crate::inventory::get_all_jobs;
use crate::output::{print_output, print_single, OutputFormat};

use super::{CommandContext, SchedulerArgs};

/// List jobs on the scheduler.
#[derive(Debug, Args)]
pub struct InventoryCommand {
    #[command(flatten)]
    pub scheduler: SchedulerArgs,
}

#[derive(Debug, Serialize, Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PORTS")]
    ports: String,
}

impl From<&JobInfo> for JobRow {
    fn from(info: &JobInfo) -> Self {
        Self {
            id: info.id.to_string(),
            name: info.name.clone(),
            ports: info.ports_display(),
        }
    }
}

impl InventoryCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = self.scheduler.client()?;
        let inventory = get_all_jobs(&client).await?;

        match ctx.format {
            OutputFormat::Table => {
                let rows: Vec<JobRow> = inventory.iter().map(JobRow::from).collect();
                print_output(&rows, ctx.format);
            }
            OutputFormat::Json => print_single(&inventory),
        }
        Ok(())
    }
}
