//! CRD manifest rendering
//!
//! Produces the CustomResourceDefinition YAML installed into clusters.

use std::io::Write;

use kube::CustomResourceExt;

use crate::error::CrdError;
use crate::managed_machine_pool::GCPManagedMachinePool;

/// Renders the CRDs of this crate as YAML
pub fn crd_yaml() -> Result<String, CrdError> {
    Ok(serde_yaml::to_string(&GCPManagedMachinePool::crd())?)
}

/// Writes the rendered CRDs to `writer`
pub fn write_crds<W: Write>(writer: &mut W) -> Result<(), CrdError> {
    let yaml = crd_yaml()?;
    writer.write_all(yaml.as_bytes())?;
    writer.flush()?;
    Ok(())
}
