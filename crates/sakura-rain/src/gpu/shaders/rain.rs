/// Rain-on-glass shader
///
/// Draws a full-screen triangle and, per fragment, layers static droplets
/// and two layers of sliding drops with trails. The drop field is
/// differentiated to get a refraction normal, and the background texture is
/// sampled at a mip level chosen by drop coverage, so the glass looks
/// blurred except where drops focus the view.
///
/// Uniform names match the shader input names exactly.
pub const SHADER_RAIN: &str = r#"
struct Uniforms {
    iResolution: vec3<f32>,
    iTime: f32,
    rainAmount: f32,
    glassBlur: f32,
    _pad: vec2<f32>,
};

struct VsOut {
    @builtin(position) position: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;
@group(0) @binding(1) var iChannel0: texture_2d<f32>;
@group(0) @binding(2) var iChannel0Sampler: sampler;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VsOut {
    var out: VsOut;
    // vertex 0: (-1, -1), vertex 1: (3, -1), vertex 2: (-1, 3)
    let x = f32(i32(vertex_index & 1u) * 4 - 1);
    let y = f32(i32(vertex_index >> 1u) * 4 - 1);
    out.position = vec4<f32>(x, y, 0.0, 1.0);
    return out;
}

// Hermite step that also accepts a > b
fn S(a: f32, b: f32, t: f32) -> f32 {
    let x = clamp((t - a) / (b - a), 0.0, 1.0);
    return x * x * (3.0 - 2.0 * x);
}

fn N13(p: f32) -> vec3<f32> {
    var p3 = fract(vec3<f32>(p) * vec3<f32>(0.1031, 0.11369, 0.13787));
    p3 = p3 + dot(p3, p3.yzx + 19.19);
    return fract(vec3<f32>(
        (p3.x + p3.y) * p3.z,
        (p3.x + p3.z) * p3.y,
        (p3.y + p3.z) * p3.x,
    ));
}

fn N(t: f32) -> f32 {
    return fract(sin(t * 12345.564) * 7658.76);
}

fn Saw(b: f32, t: f32) -> f32 {
    return S(0.0, b, t) * S(1.0, b, t);
}

fn drop_layer(uv_in: vec2<f32>, t: f32) -> vec2<f32> {
    let UV = uv_in;
    var uv = uv_in;
    uv.y = uv.y + t * 0.75;

    let a = vec2<f32>(6.0, 1.0);
    let grid = a * 2.0;
    var id = floor(uv * grid);

    let col_shift = N(id.x);
    uv.y = uv.y + col_shift;

    id = floor(uv * grid);
    let n = N13(id.x * 35.2 + id.y * 2376.1);
    let st = fract(uv * grid) - vec2<f32>(0.5, 0.0);

    var x = n.x - 0.5;
    var y = UV.y * 20.0;
    let wiggle = sin(y + sin(y));
    x = x + wiggle * (0.5 - abs(x)) * (n.z - 0.5);
    x = x * 0.7;
    let ti = fract(t + n.z);
    y = (Saw(0.85, ti) - 0.5) * 0.9 + 0.5;
    let p = vec2<f32>(x, y);

    let d = length((st - p) * a.yx);
    let main_drop = S(0.4, 0.0, d);

    let r = sqrt(S(1.0, y, st.y));
    let cd = abs(st.x - x);
    var trail = S(0.23 * r, 0.15 * r * r, cd);
    let trail_front = S(-0.02, 0.02, st.y - y);
    trail = trail * trail_front * r * r;

    y = fract(UV.y * 10.0) + (st.y - 0.5);
    let dd = length(st - vec2<f32>(x, y));
    let droplets = S(0.3, 0.0, dd);
    let m = main_drop + droplets * r * trail_front;

    return vec2<f32>(m, trail);
}

fn static_drops(uv_in: vec2<f32>, t: f32) -> f32 {
    var uv = uv_in * 40.0;
    let id = floor(uv);
    uv = fract(uv) - 0.5;
    let n = N13(id.x * 107.45 + id.y * 3543.654);
    let p = (n.xy - 0.5) * 0.7;
    let d = length(uv - p);

    let fade = Saw(0.025, fract(t + n.z));
    return S(0.3, 0.0, d) * fract(n.z * 10.0) * fade;
}

fn drops(uv: vec2<f32>, t: f32, l0: f32, l1: f32, l2: f32) -> vec2<f32> {
    let s = static_drops(uv, t) * l0;
    let m1 = drop_layer(uv, t) * l1;
    let m2 = drop_layer(uv * 1.85, t) * l2;

    var c = s + m1.x + m2.x;
    c = S(0.3, 1.0, c);

    return vec2<f32>(c, max(m1.y * l0, m2.y * l1));
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    // Bottom-left origin, y up
    let frag = vec2<f32>(in.position.x, u.iResolution.y - in.position.y);
    let uv = (frag - 0.5 * u.iResolution.xy) / u.iResolution.y;
    let UV = frag / u.iResolution.xy;

    let T = u.iTime;
    let t = T * 0.2;
    let rain = u.rainAmount;

    let max_blur = mix(3.0, 6.0, clamp(rain, 0.0, 1.0));
    let min_blur = 2.0;

    let static_layer = S(-0.5, 1.0, rain) * 2.0;
    let layer1 = S(0.25, 0.75, rain);
    let layer2 = S(0.0, 0.5, rain);

    let c = drops(uv, t, static_layer, layer1, layer2);
    let e = vec2<f32>(0.001, 0.0);
    let cx = drops(uv + e, t, static_layer, layer1, layer2).x;
    let cy = drops(uv + e.yx, t, static_layer, layer1, layer2).x;
    let n = vec2<f32>(cx - c.x, cy - c.x);

    // glassBlur 0.3 reproduces the reference blur; 0 is clear glass
    let blur_scale = u.glassBlur / 0.3;
    let focus = max(mix(max_blur - c.y, min_blur, S(0.1, 0.2, c.x)) * blur_scale, 0.0);

    // Texture rows run top to bottom
    let tex_uv = vec2<f32>(UV.x + n.x, 1.0 - (UV.y + n.y));
    let col = textureSampleLevel(iChannel0, iChannel0Sampler, tex_uv, focus).rgb;

    return vec4<f32>(col, 1.0);
}
"#;
