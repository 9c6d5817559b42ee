//! Prints the MyService CustomResourceDefinition as YAML.
//!
//! ```sh
//! cargo run -p crds --bin crdgen > config/crd/myservices.yaml
//! ```

use crds::MyService;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&MyService::crd())?;
    print!("{yaml}");
    Ok(())
}
