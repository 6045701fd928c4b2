/*
 * deployer-manifests - the embedded manifests of the topology aware
 * scheduling stack (NodeResourceTopology API, scheduler plugin and
 * resource topology exporter) and the code to turn them into typed,
 * deployment-ready objects.
 */

pub mod catalog;
pub use catalog::RawManifest;

pub mod component;
pub use component::Component;
pub use component::ManifestRef;
pub use component::Role;

pub mod errors;
pub use errors::Error;
pub use errors::Result;

pub mod scheme;
pub use scheme::Kind;
pub use scheme::Scheme;

pub mod object;
pub use object::FromTypedObject;
pub use object::ObjectIdentity;
pub use object::TypedObject;
pub use object::serialize_object;

pub mod decoder;
pub use decoder::Decoder;

pub mod loader;
pub use loader::ManifestLoader;

pub mod images;
pub mod template;

pub mod updates;
pub use updates::PatchContext;
