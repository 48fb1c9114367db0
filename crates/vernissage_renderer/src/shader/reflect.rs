//! Uniform reflection: which names live at which binding and byte offset.

use std::collections::{BTreeMap, HashMap};

use naga::{AddressSpace, Module, Scalar, TypeInner, VectorSize};
use vernissage_core::interface::UNIFORM_GROUP;

/// Value types a uniform can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Mat4,
    Vec4,
    Vec3,
    Vec2,
    F32,
    /// Anything else (arrays, integer vectors, nested structs).  Present in
    /// the table so names resolve, but never writable.
    Other,
}

impl UniformKind {
    fn of(inner: &TypeInner) -> Self {
        match *inner {
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar: Scalar::F32,
            } => UniformKind::Mat4,
            TypeInner::Vector {
                size,
                scalar: Scalar::F32,
            } => match size {
                VectorSize::Quad => UniformKind::Vec4,
                VectorSize::Tri => UniformKind::Vec3,
                VectorSize::Bi => UniformKind::Vec2,
            },
            TypeInner::Scalar(Scalar::F32) => UniformKind::F32,
            _ => UniformKind::Other,
        }
    }
}

/// Where a named uniform lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub binding: u32,
    pub offset: u32,
    pub kind: UniformKind,
}

/// One uniform buffer of bind group 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBinding {
    pub binding: u32,
    /// Size in bytes as declared by the shader.
    pub size: u64,
}

/// Declared type of one binding, reduced to what writes depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingShape {
    Value(UniformKind),
    /// `(offset, kind)` of every member, in declaration order.
    Struct(Vec<(u32, UniformKind)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BindingLayout {
    size: u64,
    shape: BindingShape,
}

/// Name → [`UniformSlot`] map of a shader stage or a whole program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformTable {
    slots: HashMap<String, UniformSlot>,
    bindings: BTreeMap<u32, BindingLayout>,
}

impl UniformTable {
    /// Collects the uniforms of one stage.
    ///
    /// A struct-typed uniform contributes one entry per member; any other
    /// uniform contributes its variable name.  Uniforms outside bind group
    /// [`UNIFORM_GROUP`] are reported as `Err(variable name)`.
    pub fn reflect(module: &Module) -> Result<Self, String> {
        let mut table = Self::default();
        for (_, var) in module.global_variables.iter() {
            if var.space != AddressSpace::Uniform {
                continue;
            }
            let name = var.name.clone().unwrap_or_default();
            let Some(binding) = &var.binding else {
                continue;
            };
            if binding.group != UNIFORM_GROUP {
                return Err(name);
            }

            let inner = &module.types[var.ty].inner;
            let size = inner.size(module.to_ctx()) as u64;

            let shape = match inner {
                TypeInner::Struct { members, .. } => {
                    for member in members {
                        let Some(member_name) = &member.name else {
                            continue;
                        };
                        table.slots.insert(
                            member_name.clone(),
                            UniformSlot {
                                binding: binding.binding,
                                offset: member.offset,
                                kind: UniformKind::of(&module.types[member.ty].inner),
                            },
                        );
                    }
                    BindingShape::Struct(
                        members
                            .iter()
                            .map(|m| (m.offset, UniformKind::of(&module.types[m.ty].inner)))
                            .collect(),
                    )
                }
                other => {
                    let kind = UniformKind::of(other);
                    table.slots.insert(
                        name,
                        UniformSlot {
                            binding: binding.binding,
                            offset: 0,
                            kind,
                        },
                    );
                    BindingShape::Value(kind)
                }
            };
            table
                .bindings
                .insert(binding.binding, BindingLayout { size, shape });
        }
        Ok(table)
    }

    /// Combines the tables of two stages.
    ///
    /// A binding both stages declare must have the same layout, and a name
    /// both stages declare must agree on binding, offset and kind.  The first
    /// disagreement is returned as an error message.
    pub fn merge(mut self, other: &UniformTable) -> Result<Self, String> {
        for (binding, layout) in &other.bindings {
            match self.bindings.get(binding) {
                Some(existing) if existing != layout => {
                    return Err(format!(
                        "binding {binding} is declared as {:?} ({} bytes) in one stage and {:?} ({} bytes) in the other",
                        existing.shape, existing.size, layout.shape, layout.size
                    ));
                }
                Some(_) => {}
                None => {
                    self.bindings.insert(*binding, layout.clone());
                }
            }
        }
        for (name, slot) in &other.slots {
            match self.slots.get(name) {
                Some(existing) if existing != slot => {
                    return Err(format!(
                        "uniform `{name}` is declared as {existing:?} in one stage and {slot:?} in the other"
                    ));
                }
                Some(_) => {}
                None => {
                    self.slots.insert(name.clone(), *slot);
                }
            }
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    pub fn has_binding(&self, binding: u32) -> bool {
        self.bindings.contains_key(&binding)
    }

    /// Declared type at `binding`.
    pub fn shape(&self, binding: u32) -> Option<&BindingShape> {
        self.bindings.get(&binding).map(|layout| &layout.shape)
    }

    /// Uniform buffers, sorted by binding.
    pub fn bindings(&self) -> Vec<UniformBinding> {
        self.bindings
            .iter()
            .map(|(&binding, layout)| UniformBinding {
                binding,
                size: layout.size,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
