use std::collections::BTreeSet;

use wgpu::naga;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::ShaderStage;

pub const COMPUTE_ENTRY: &str = "main";
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Parses and validates WGSL for `stage` against the baseline feature set.
///
/// On failure the returned string is the rendered compiler diagnostic.
pub fn compile_wgsl(stage: ShaderStage, source: &str) -> Result<naga::Module, String> {
    compile_wgsl_with(stage, source, Capabilities::empty())
}

/// Like [`compile_wgsl`], but validates against the given device capabilities.
pub fn compile_wgsl_with(
    stage: ShaderStage,
    source: &str,
    capabilities: Capabilities,
) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), capabilities)
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    find_entry(&module, stage)?;
    check_bindings(&module, stage)?;
    Ok(module)
}

/// Resource kinds the shared pipeline layouts provide.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Slot {
    Uniform,
    /// 2D `rgba8unorm` storage texture, write-only.
    StorageImage,
    /// 2D float sampled texture.
    SampledImage,
    Sampler,
}

/// Kernel layout: params uniform at (0, 0), output surface at (0, 1).
/// Quad layout: quad uniform at (0, 0), source texture at (1, 0), sampler at (1, 1).
fn layout_slot(stage: ShaderStage, group: u32, binding: u32) -> Option<Slot> {
    match (stage, group, binding) {
        (ShaderStage::Compute, 0, 0) => Some(Slot::Uniform),
        (ShaderStage::Compute, 0, 1) => Some(Slot::StorageImage),
        (ShaderStage::Vertex | ShaderStage::Fragment, 0, 0) => Some(Slot::Uniform),
        (ShaderStage::Vertex | ShaderStage::Fragment, 1, 0) => Some(Slot::SampledImage),
        (ShaderStage::Vertex | ShaderStage::Fragment, 1, 1) => Some(Slot::Sampler),
        _ => None,
    }
}

fn slot_of(module: &naga::Module, var: &naga::GlobalVariable) -> Option<Slot> {
    use naga::{AddressSpace, ImageClass, ImageDimension, TypeInner};

    match (var.space, &module.types[var.ty].inner) {
        (AddressSpace::Uniform, _) => Some(Slot::Uniform),
        (
            AddressSpace::Handle,
            TypeInner::Image {
                dim: ImageDimension::D2,
                arrayed: false,
                class: ImageClass::Storage { format, access },
            },
        ) if *format == naga::StorageFormat::Rgba8Unorm
            && *access == naga::StorageAccess::STORE =>
        {
            Some(Slot::StorageImage)
        }
        (
            AddressSpace::Handle,
            TypeInner::Image {
                dim: ImageDimension::D2,
                arrayed: false,
                class: ImageClass::Sampled { kind: naga::ScalarKind::Float, multi: false },
            },
        ) => Some(Slot::SampledImage),
        (AddressSpace::Handle, TypeInner::Sampler { comparison: false }) => Some(Slot::Sampler),
        _ => None,
    }
}

/// Checks every bound resource against the pipeline layout `stage` links with.
///
/// A shader may use a subset of the layout; anything outside it, or of the
/// wrong kind, is rejected here instead of at pipeline creation.
pub fn check_bindings(module: &naga::Module, stage: ShaderStage) -> Result<(), String> {
    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");
        let (group, binding) = (rb.group, rb.binding);

        let Some(expected) = layout_slot(stage, group, binding) else {
            return Err(format!(
                "`{name}` at @group({group}) @binding({binding}) is not part of the {stage} layout"
            ));
        };

        match slot_of(module, var) {
            Some(found) if found == expected => {}
            _ => {
                return Err(format!(
                    "`{name}` at @group({group}) @binding({binding}) must be a {}",
                    describe(expected)
                ));
            }
        }
    }
    Ok(())
}

fn describe(slot: Slot) -> &'static str {
    match slot {
        Slot::Uniform => "uniform buffer",
        Slot::StorageImage => "texture_storage_2d<rgba8unorm, write>",
        Slot::SampledImage => "texture_2d<f32>",
        Slot::Sampler => "filtering sampler",
    }
}

/// Checks that every fragment input location is written by the vertex stage.
pub fn check_interface(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), String> {
    let vs = find_entry(vertex, ShaderStage::Vertex)?;
    let fs = find_entry(fragment, ShaderStage::Fragment)?;

    let mut outputs = BTreeSet::new();
    if let Some(result) = &vs.function.result {
        collect_locations(vertex, result.ty, result.binding.as_ref(), &mut outputs);
    }

    let mut inputs = BTreeSet::new();
    for arg in &fs.function.arguments {
        collect_locations(fragment, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    match inputs.difference(&outputs).next() {
        Some(missing) => Err(format!(
            "fragment input @location({missing}) is not written by the vertex stage"
        )),
        None => Ok(()),
    }
}

fn find_entry(module: &naga::Module, stage: ShaderStage) -> Result<&naga::EntryPoint, String> {
    let name = stage.entry_point();
    let expected = match stage {
        ShaderStage::Compute => naga::ShaderStage::Compute,
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    match module.entry_points.iter().find(|ep| ep.name == name) {
        Some(ep) if ep.stage == expected => Ok(ep),
        Some(ep) => Err(format!(
            "entry point `{name}` is a {:?} shader, expected {stage}",
            ep.stage
        )),
        None => Err(format!("missing {stage} entry point `{name}`")),
    }
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        // Unbound arguments/results are structs whose members carry the bindings.
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}
