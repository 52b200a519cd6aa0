//! Mapping resolution.
//!
//! [`resolve_mapping`] is a pure function from a parsed description and a
//! request to a [`Mapping`]. [`MappingBuilder`] sequences reading, parsing and
//! resolving for a store adapter and guarantees that a failed attempt leaves
//! nothing half-built behind.

use crate::config::{MappingConfig, UnmatchedPolicy};
use crate::error::{PersistError, Result};
use crate::mapping::{ClassFragment, Mapping, MappingDocument};
use crate::schema::RecordSchema;
use crate::types::{DataType, Field, FieldType, MappingKey};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// What a store adapter asks the builder to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingRequest {
    /// Key and record type names matched against class fragments.
    pub key: MappingKey,

    /// Container name the adapter derived on its own (configuration or type name).
    pub default_container: String,
}

impl MappingRequest {
    pub fn new(
        key_type: impl Into<String>,
        record_type: impl Into<String>,
        default_container: impl Into<String>,
    ) -> Self {
        Self {
            key: MappingKey::new(key_type, record_type),
            default_container: default_container.into(),
        }
    }

    /// Request for a record schema, defaulting the container to its simple name.
    pub fn for_schema(key_type: impl Into<String>, schema: &RecordSchema) -> Self {
        Self::new(key_type, schema.full_name(), schema.simple_name())
    }

    pub fn with_default_container(mut self, container: impl Into<String>) -> Self {
        self.default_container = container.into();
        self
    }
}

/// Declared and derived container names disagreed during resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerDivergence {
    /// Name declared by the fragment, if any.
    pub declared: Option<String>,

    /// Name derived by the caller.
    pub derived: String,
}

/// Outcome of [`resolve_mapping`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub mapping: Mapping,
    pub divergence: Option<ContainerDivergence>,
}

/// Resolve the fragment for `request` from a parsed description.
///
/// The first fragment matching both type names is used; every other fragment
/// is ignored. A declared container name wins over the derived one.
pub fn resolve_mapping(
    document: &MappingDocument,
    request: &MappingRequest,
    unmatched: UnmatchedPolicy,
) -> Result<Resolution> {
    let fragment = document.find_class(&request.key.key_type, &request.key.record_type);

    let Some(fragment) = fragment else {
        return match unmatched {
            UnmatchedPolicy::Empty => {
                info!(key = %request.key, "No mapping fragment matched, using empty mapping");
                Ok(Resolution {
                    mapping: Mapping::empty(),
                    divergence: None,
                })
            }
            UnmatchedPolicy::Fail => Err(PersistError::MappingNotFound(request.key.clone())),
        };
    };

    let (container, divergence) = resolve_container(fragment, &request.default_container);
    if let Some(divergence) = &divergence {
        warn!(
            key = %request.key,
            declared = divergence.declared.as_deref().unwrap_or("<none>"),
            derived = %divergence.derived,
            "Key and record types match but container names differ, assuming they are the same"
        );
    }

    let mut mapping = Mapping::with_container(container);
    for field in &fragment.fields {
        let data_type: DataType = field.type_name.parse()?;
        let field_type = FieldType {
            data_type,
            scaling_factor: field.scaling_factor,
        };
        mapping.insert_field(field.name.clone(), Field::new(field.docfield.clone(), field_type));
    }

    info!(
        key = %request.key,
        container = mapping.container_name().unwrap_or_default(),
        fields = mapping.len(),
        "Mapping resolved"
    );

    Ok(Resolution {
        mapping,
        divergence,
    })
}

fn resolve_container(
    fragment: &ClassFragment,
    derived: &str,
) -> (String, Option<ContainerDivergence>) {
    let declared = fragment.index.as_deref().filter(|name| !name.is_empty());
    let container = declared.unwrap_or(derived).to_string();

    let divergence = if declared == Some(derived) {
        None
    } else {
        Some(ContainerDivergence {
            declared: declared.map(str::to_string),
            derived: derived.to_string(),
        })
    };

    (container, divergence)
}

/// Observable builder state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing loaded, or the last attempt failed.
    Idle,
    /// A description was parsed but not yet resolved.
    Parsed,
    /// The mapping is available.
    Resolved,
}

enum Stage {
    Idle,
    Parsed(MappingDocument),
    Resolved(Mapping),
}

/// Loads a mapping description for one (key type, record type) pair.
pub struct MappingBuilder {
    request: MappingRequest,
    config: MappingConfig,
    stage: Stage,
    divergence: Option<ContainerDivergence>,
}

impl MappingBuilder {
    pub fn new(request: MappingRequest) -> Self {
        Self::with_config(request, MappingConfig::default())
    }

    pub fn with_config(request: MappingRequest, config: MappingConfig) -> Self {
        Self {
            request,
            config,
            stage: Stage::Idle,
            divergence: None,
        }
    }

    pub fn request(&self) -> &MappingRequest {
        &self.request
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    pub fn state(&self) -> BuilderState {
        match self.stage {
            Stage::Idle => BuilderState::Idle,
            Stage::Parsed(_) => BuilderState::Parsed,
            Stage::Resolved(_) => BuilderState::Resolved,
        }
    }

    /// Read and parse a description, replacing whatever was loaded before.
    pub fn parse<R: Read>(&mut self, input: R) -> Result<()> {
        self.stage = Stage::Idle;
        self.divergence = None;

        let document = MappingDocument::from_reader(input, self.config.format)?;
        debug!(
            key = %self.request.key,
            fragments = document.classes.len(),
            "Mapping description parsed"
        );
        self.stage = Stage::Parsed(document);
        Ok(())
    }

    /// Resolve the parsed description. Returns the existing mapping if
    /// already resolved.
    pub fn resolve(&mut self) -> Result<&Mapping> {
        let document = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Parsed(document) => document,
            Stage::Resolved(mapping) => {
                self.stage = Stage::Resolved(mapping);
                return self.resolved();
            }
            Stage::Idle => {
                return Err(PersistError::InvalidState(
                    "resolve called before a description was parsed",
                ))
            }
        };

        let resolution = resolve_mapping(&document, &self.request, self.config.unmatched)?;
        self.divergence = resolution.divergence;
        self.stage = Stage::Resolved(resolution.mapping);
        self.resolved()
    }

    /// Parse and resolve in one step.
    pub fn load<R: Read>(&mut self, input: R) -> Result<&Mapping> {
        self.parse(input)?;
        self.resolve()
    }

    /// [`load`](Self::load) for adapters whose mapping resource may be missing.
    pub fn load_optional<R: Read>(&mut self, input: Option<R>) -> Result<&Mapping> {
        match input {
            Some(input) => self.load(input),
            None => {
                self.stage = Stage::Idle;
                self.divergence = None;
                Err(PersistError::MappingSource(
                    "the mapping input stream is absent".into(),
                ))
            }
        }
    }

    /// Load a description from a file.
    ///
    /// Errors carry the path; a file that cannot be opened keeps its OS reason.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&Mapping> {
        let path = path.as_ref();
        let with_path = |e: PersistError| match e {
            PersistError::MappingSource(msg) => {
                PersistError::MappingSource(format!("{}: {}", path.display(), msg))
            }
            other => other,
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Mapping file could not be opened");
                self.stage = Stage::Idle;
                self.divergence = None;
                return Err(with_path(e.into()));
            }
        };
        self.load(BufReader::new(file)).map_err(with_path)
    }

    /// Load the file named by [`MappingConfig::mapping_file`].
    pub fn load_default_file(&mut self) -> Result<&Mapping> {
        let path = self.config.mapping_file.clone();
        self.load_file(path)
    }

    /// The resolved mapping, if any.
    pub fn mapping(&self) -> Option<&Mapping> {
        match &self.stage {
            Stage::Resolved(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Container-name divergence seen by the last successful resolution.
    pub fn divergence(&self) -> Option<&ContainerDivergence> {
        self.divergence.as_ref()
    }

    /// Consume the builder, keeping only the resolved mapping.
    pub fn into_mapping(self) -> Option<Mapping> {
        match self.stage {
            Stage::Resolved(mapping) => Some(mapping),
            _ => None,
        }
    }

    fn resolved(&self) -> Result<&Mapping> {
        self.mapping()
            .ok_or(PersistError::InvalidState("mapping is not resolved"))
    }
}
