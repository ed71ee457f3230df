//! `template`: an example deployment to start from

use anyhow::Result;
use tco_lib::{
    ComputeResources, NetworkResources, StorageResources, TelcoDeployment, TrafficSplit,
    UserPlaneLocation,
};

use crate::output::print_json;

/// A two-site 5G core with a Graviton-friendly instance preference
pub fn example_deployment() -> Result<TelcoDeployment> {
    let compute = ComputeResources::new(96, 384)?
        .with_instance_types(["m6g.4xlarge", "m5.4xlarge"]);
    let network = NetworkResources::new(20.0, 150.0, TrafficSplit::new(80.0, 20.0)?)?;

    Ok(TelcoDeployment::new(
        UserPlaneLocation::Region,
        compute,
        StorageResources::new(2000, 500, 1000),
        network,
        2,
        2,
        "us-east-1",
    )?)
}

/// Print the example as JSON, ready for `--file`
pub fn template() -> Result<()> {
    print_json(&example_deployment()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trips() {
        let deployment = example_deployment().unwrap();
        let json = serde_json::to_string(&deployment).unwrap();
        let parsed: TelcoDeployment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deployment);
    }
}
