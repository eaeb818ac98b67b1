//! Render command: print the job definition without network access.

use anyhow::Result;
use clap::Args;
use nomad_run_jobspec::{render_hcl, JobDefinition};

use crate::output::{print_single, OutputFormat};

use super::{CommandContext, JobArgs};

/// Print the HCL job definition for the given inputs.
#[derive(Debug, Args)]
pub struct RenderCommand {
    #[command(flatten)]
    pub job: JobArgs,
}

impl RenderCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let descriptor = self.job.descriptor()?;
        let hcl = render_hcl(&JobDefinition::from_descriptor(&descriptor));

        match ctx.format {
            OutputFormat::Table => print!("{hcl}"),
            OutputFormat::Json => print_single(&serde_json::json!({
                "descriptor": descriptor,
                "hcl": hcl,
            })),
        }
        Ok(())
    }
}
