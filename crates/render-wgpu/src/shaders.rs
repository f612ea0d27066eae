/// WGSL shader for instanced screen-space rectangles.
///
/// The vertex buffer holds a unit quad; each instance carries its pixel
/// rectangle `(x, y, width, height)` and color.
pub const QUAD_SHADER: &str = r#"
struct Uniforms {
    projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) corner: vec2<f32>,
};

struct InstanceInput {
    @location(1) rect: vec4<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_quad(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let position = instance.rect.xy + vertex.corner * instance.rect.zw;

    var out: VertexOutput;
    out.clip_position = uniforms.projection * vec4<f32>(position, 0.0, 1.0);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_quad(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
