//! Registry of dataset signatures and capability detectors.
//!
//! The registry maps what a file header looks like to the dataset kind
//! that understands it, and to the optional capabilities that can be
//! layered on top. Built-ins are registered at construction; callers can
//! add their own at runtime.

use implore_io::FileHeader;

use crate::types::{Capability, DatasetKind};

/// Recognizes the dataset kind of a header
pub trait DatasetSignature: Send + Sync {
    /// Kind produced when the signature matches
    fn kind(&self) -> DatasetKind;

    /// Whether the header matches this signature
    fn matches(&self, header: &FileHeader) -> bool;
}

/// Detects one optional capability from a header
pub trait CapabilityDetector: Send + Sync {
    fn capability(&self) -> Capability;

    fn detect(&self, header: &FileHeader) -> bool;
}

/// Arepo snapshots carry particle groups plus their run configuration
struct ArepoSnapshotSignature;

impl DatasetSignature for ArepoSnapshotSignature {
    fn kind(&self) -> DatasetKind {
        DatasetKind::ArepoSnapshot
    }

    fn matches(&self, header: &FileHeader) -> bool {
        header.has_header()
            && header.has_group_prefix("PartType")
            && (header.has_group("Config") || header.has_group("Parameters"))
    }
}

struct GadgetStyleSignature;

impl DatasetSignature for GadgetStyleSignature {
    fn kind(&self) -> DatasetKind {
        DatasetKind::GadgetStyleSnapshot
    }

    fn matches(&self, header: &FileHeader) -> bool {
        header.has_header() && header.has_group_prefix("PartType")
    }
}

struct GroupCatalogSignature;

impl DatasetSignature for GroupCatalogSignature {
    fn kind(&self) -> DatasetKind {
        DatasetKind::GroupCatalog
    }

    fn matches(&self, header: &FileHeader) -> bool {
        header.has_group("Group") || header.has_group("Subhalo")
    }
}

struct GenericSignature;

impl DatasetSignature for GenericSignature {
    fn kind(&self) -> DatasetKind {
        DatasetKind::GenericHdf5
    }

    fn matches(&self, _header: &FileHeader) -> bool {
        true
    }
}

/// Capability present when every listed header attribute exists
struct AttributeCapability {
    capability: Capability,
    attributes: &'static [&'static str],
}

impl CapabilityDetector for AttributeCapability {
    fn capability(&self) -> Capability {
        self.capability.clone()
    }

    fn detect(&self, header: &FileHeader) -> bool {
        self.attributes.iter().all(|a| header.has_attr(a))
    }
}

/// Registry of dataset signatures (in priority order) and capability detectors
pub struct TypeRegistry {
    signatures: Vec<Box<dyn DatasetSignature>>,
    capabilities: Vec<Box<dyn CapabilityDetector>>,
}

impl TypeRegistry {
    /// Create a new registry with all built-in signatures registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// Register all built-in signatures and detectors
    fn register_builtins(&mut self) {
        // Most specific first
        self.register_signature(Box::new(ArepoSnapshotSignature));
        self.register_signature(Box::new(GadgetStyleSignature));
        self.register_signature(Box::new(GroupCatalogSignature));
        self.register_signature(Box::new(GenericSignature));

        self.register_capability(Box::new(AttributeCapability {
            capability: Capability::Cosmology,
            attributes: &["Redshift", "HubbleParam"],
        }));
        self.register_capability(Box::new(AttributeCapability {
            capability: Capability::Spatial3D,
            attributes: &["BoxSize"],
        }));
        self.register_capability(Box::new(AttributeCapability {
            capability: Capability::Units,
            attributes: &["UnitLength_in_cm"],
        }));
    }

    /// Register a signature. Signatures are tried in registration order.
    pub fn register_signature(&mut self, signature: Box<dyn DatasetSignature>) {
        self.signatures.push(signature);
    }

    /// Register a signature ahead of all existing ones
    pub fn register_signature_first(&mut self, signature: Box<dyn DatasetSignature>) {
        self.signatures.insert(0, signature);
    }

    pub fn register_capability(&mut self, detector: Box<dyn CapabilityDetector>) {
        self.capabilities.push(detector);
    }

    /// Kind of the first signature matching the header
    pub fn detect_kind(&self, header: &FileHeader) -> Option<DatasetKind> {
        self.signatures
            .iter()
            .find(|s| s.matches(header))
            .map(|s| s.kind())
    }

    /// All capabilities detected on the header, in registration order
    pub fn detect_capabilities(&self, header: &FileHeader) -> Vec<Capability> {
        let mut found: Vec<Capability> = Vec::new();
        for detector in &self.capabilities {
            let capability = detector.capability();
            if detector.detect(header) && !found.contains(&capability) {
                found.push(capability);
            }
        }
        found
    }

    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    pub fn num_capabilities(&self) -> usize {
        self.capabilities.len()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
