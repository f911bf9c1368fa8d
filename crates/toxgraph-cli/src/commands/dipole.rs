use super::{load_charges, load_structure};
use crate::cli::DipoleArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::Result;
use crate::utils::output::write_json;
use toxgraph::workflows;
use tracing::info;

pub fn run(args: DipoleArgs) -> Result<()> {
    let config = PartialAnalysisConfig::load(args.config.config.as_deref())?.merge_with_cli(
        &CliOverrides {
            mass_weighted: args.mass_weighted,
            properties: args.config.properties.as_deref(),
            set_values: &args.config.set_values,
            ..Default::default()
        },
    )?;

    let system = load_structure(&args.io.input)?;
    let charges = load_charges(args.psf.as_deref())?;

    let dipole = workflows::compute_dipole_with(
        &system,
        charges.as_deref(),
        &config.graph.properties,
        &config.dipole,
    )?;
    info!(
        "Dipole magnitude {:.4} e·Å at {:.2}° from the reference axis.",
        dipole.magnitude, dipole.angle_with_z_axis.degrees
    );
    write_json(&dipole, args.io.output.as_deref())
}
