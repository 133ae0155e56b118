use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use glam::{Mat3, Mat4};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, Document, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::animation::{animate, Clock};
use crate::config::SceneLayout;
use crate::error::BackdropError;
use crate::label::LabelStyle;
use crate::rng;
use crate::scene::geometry::Geometry;
use crate::scene::{self, Backdrop, Drawable, Material};

/// World-space diameter of a unit-sized particle.
const POINT_SCALE: f32 = 0.08;

const MESH_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;
uniform mat4 u_model;
uniform mat4 u_view_proj;
uniform mat3 u_normal_matrix;
out vec3 v_world;
out vec3 v_normal;
out vec2 v_uv;
void main() {
    vec4 w = u_model * vec4(a_position, 1.0);
    v_world = w.xyz;
    v_normal = u_normal_matrix * a_normal;
    v_uv = a_uv;
    gl_Position = u_view_proj * w;
}
"#;

const MESH_FS: &str = r#"#version 300 es
precision highp float;
in vec3 v_world;
in vec3 v_normal;
in vec2 v_uv;
uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_emissive;
uniform vec3 u_ambient;
uniform vec3 u_dir_color;
uniform vec3 u_dir_to_light;
uniform vec3 u_point_color;
uniform vec3 u_point_pos;
uniform float u_point_range;
uniform int u_lit;
uniform int u_textured;
uniform sampler2D u_texture;
out vec4 o_color;
void main() {
    vec4 base = vec4(u_color, u_opacity);
    if (u_textured == 1) {
        base *= texture(u_texture, v_uv);
    }
    if (u_lit == 0) {
        o_color = base;
        return;
    }
    vec3 n = normalize(v_normal);
    if (!gl_FrontFacing) n = -n;
    vec3 light = u_ambient + u_dir_color * max(dot(n, u_dir_to_light), 0.0);
    vec3 to_p = u_point_pos - v_world;
    float d = length(to_p);
    float fall = clamp(1.0 - d / u_point_range, 0.0, 1.0);
    light += u_point_color * max(dot(n, to_p / max(d, 1e-4)), 0.0) * fall * fall;
    o_color = vec4(base.rgb * light + u_emissive, base.a);
}
"#;

const POINTS_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;
layout(location = 2) in float a_size;
uniform mat4 u_model;
uniform mat4 u_view_proj;
uniform float u_scale;
out vec3 v_color;
void main() {
    vec4 p = u_view_proj * u_model * vec4(a_position, 1.0);
    gl_Position = p;
    gl_PointSize = max(a_size * u_scale / p.w, 1.0);
    v_color = a_color;
}
"#;

const POINTS_FS: &str = r#"#version 300 es
precision highp float;
in vec3 v_color;
uniform float u_opacity;
out vec4 o_color;
void main() {
    vec2 c = gl_PointCoord - 0.5;
    if (dot(c, c) > 0.25) discard;
    o_color = vec4(v_color, u_opacity);
}
"#;

/// Start the background: build the scene, hook resize, and run the
/// redraw loop until the page goes away.
pub fn start(document: &Document, canvas: HtmlCanvasElement) -> Result<(), BackdropError> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or_else(|| BackdropError::Capability("WebGL2 not supported".into()))?
        .dyn_into()
        .map_err(|_| BackdropError::Capability("webgl2 context has unexpected type".into()))?;

    let layout = read_layout(document);
    let (w, h, dpr) = viewport()?;
    let backdrop = scene::build(&layout, w, h, &mut rng::from_entropy());
    let mut renderer = Renderer::new(gl, canvas, &backdrop)?;
    for (i, text) in backdrop.labels.iter().enumerate() {
        renderer.add_label(i, &super::label::paint(document, text, &LabelStyle::default())?)?;
    }
    renderer.resize(w, h, dpr);

    let controller = Rc::new(RefCell::new(Controller { backdrop, renderer, clock: Clock::default() }));

    // Keep drawing buffer and camera in step with the window
    let resize_closure = {
        let controller = controller.clone();
        Closure::wrap(Box::new(move || match viewport() {
            Ok((w, h, dpr)) => controller.borrow_mut().resize(w, h, dpr),
            Err(e) => log::warn!("resize skipped: {}", e),
        }) as Box<dyn FnMut()>)
    };
    window()
        .ok_or_else(|| BackdropError::Dom("no window".into()))?
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Redraw loop: the frame closure reschedules itself through `f`, which is
    // filled in after the closure exists.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        controller.borrow_mut().tick(now);

        // schedule next
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("redraw scheduling failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        window()
            .ok_or_else(|| BackdropError::Dom("no window".into()))?
            .request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    log::info!("background running");
    Ok(())
}

/// CSS size and device pixel ratio of the window.
fn viewport() -> Result<(f32, f32, f32), BackdropError> {
    let w = window().ok_or_else(|| BackdropError::Dom("no window".into()))?;
    let width = w.inner_width()?.as_f64().unwrap_or(1.0);
    let height = w.inner_height()?.as_f64().unwrap_or(1.0);
    Ok((width as f32, height as f32, w.device_pixel_ratio() as f32))
}

/// Defaults, overridden by an inline `#backdrop-config` JSON block if present.
fn read_layout(document: &Document) -> SceneLayout {
    let Some(src) = document.get_element_by_id("backdrop-config").and_then(|el| el.text_content()) else {
        return SceneLayout::default();
    };
    SceneLayout::from_json(&src).unwrap_or_else(|e| {
        log::warn!("ignoring backdrop config: {}", e);
        SceneLayout::default()
    })
}

/// Owns the scene context and the GPU state; the only thing the page's
/// callbacks close over.
struct Controller {
    backdrop: Backdrop,
    renderer: Renderer,
    clock: Clock,
}

impl Controller {
    fn tick(&mut self, now_ms: f64) {
        let t = self.clock.elapsed(now_ms);
        animate(&mut self.backdrop, t);
        self.renderer.draw(&self.backdrop);
    }

    fn resize(&mut self, w: f32, h: f32, dpr: f32) {
        self.backdrop.camera.resize(w, h);
        self.renderer.resize(w, h, dpr);
    }
}

struct GpuMesh {
    vao: WebGlVertexArrayObject,
    count: i32,
    /// Edge list for wireframe materials.
    edges: Option<(WebGlVertexArrayObject, i32)>,
    lines: bool,
}

struct MeshProgram {
    program: WebGlProgram,
    model: Option<WebGlUniformLocation>,
    view_proj: Option<WebGlUniformLocation>,
    normal_matrix: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    dir_color: Option<WebGlUniformLocation>,
    dir_to_light: Option<WebGlUniformLocation>,
    point_color: Option<WebGlUniformLocation>,
    point_pos: Option<WebGlUniformLocation>,
    point_range: Option<WebGlUniformLocation>,
    lit: Option<WebGlUniformLocation>,
    textured: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
}

struct PointsProgram {
    program: WebGlProgram,
    model: Option<WebGlUniformLocation>,
    view_proj: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

struct PointsBuffers {
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    count: i32,
}

struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    mesh: MeshProgram,
    points: PointsProgram,
    meshes: Vec<GpuMesh>,
    cloud: PointsBuffers,
    labels: Vec<Option<WebGlTexture>>,
    point_scale: f32,
}

impl Renderer {
    fn new(gl: GL, canvas: HtmlCanvasElement, backdrop: &Backdrop) -> Result<Self, BackdropError> {
        let mesh = MeshProgram::new(&gl)?;
        let points = PointsProgram::new(&gl)?;

        let wired: HashSet<usize> = backdrop
            .scene
            .nodes()
            .iter()
            .filter(|n| n.material.wireframe)
            .filter_map(|n| match n.drawable {
                Drawable::Mesh(id) => Some(id.index()),
                _ => None,
            })
            .collect();

        let meshes = backdrop
            .scene
            .geometries()
            .iter()
            .enumerate()
            .map(|(i, g)| upload_geometry(&gl, g, wired.contains(&i)))
            .collect::<Result<Vec<_>, _>>()?;

        let cloud = upload_points(&gl, backdrop)?;

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            gl,
            canvas,
            mesh,
            points,
            meshes,
            cloud,
            labels: vec![None; backdrop.labels.len()],
            point_scale: 1.0,
        })
    }

    fn add_label(&mut self, index: usize, painted: &HtmlCanvasElement) -> Result<(), BackdropError> {
        let gl = &self.gl;
        let tex = gl.create_texture().ok_or_else(|| BackdropError::Gpu("create_texture".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&tex));
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
        gl.tex_image_2d_with_u32_and_u32_and_html_canvas_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            painted,
        )?;
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
        gl.generate_mipmap(GL::TEXTURE_2D);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR_MIPMAP_LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        if let Some(slot) = self.labels.get_mut(index) {
            *slot = Some(tex);
        }
        Ok(())
    }

    fn resize(&mut self, w: f32, h: f32, dpr: f32) {
        let (pw, ph) = ((w * dpr).max(1.0) as u32, (h * dpr).max(1.0) as u32);
        self.canvas.set_width(pw);
        self.canvas.set_height(ph);
        self.gl.viewport(0, 0, pw as i32, ph as i32);
        self.point_scale = ph as f32;
    }

    fn draw(&self, backdrop: &Backdrop) {
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let cam = &backdrop.camera;
        let view_proj = cam.view_projection().to_cols_array();
        let world = backdrop.scene.world_matrices();

        gl.use_program(Some(&self.mesh.program));
        self.set_lights(backdrop);
        gl.uniform_matrix4fv_with_f32_array(self.mesh.view_proj.as_ref(), false, &view_proj);

        // opaque first, then blended without depth writes
        for pass_blended in [false, true] {
            gl.depth_mask(!pass_blended);
            for (i, node) in backdrop.scene.nodes().iter().enumerate() {
                let blended = node.material.opacity < 1.0 || node.material.label.is_some();
                if blended != pass_blended {
                    continue;
                }
                match node.drawable {
                    Drawable::Mesh(id) | Drawable::Lines(id) => {
                        if let Some(m) = self.meshes.get(id.index()) {
                            self.draw_mesh(m, &node.material, world[i]);
                        }
                    }
                    Drawable::Points | Drawable::Group => {}
                }
            }
        }

        // the cloud is always blended
        if let Some((i, node)) = backdrop
            .scene
            .nodes()
            .iter()
            .enumerate()
            .find(|(_, n)| n.drawable == Drawable::Points)
        {
            self.draw_points(backdrop, &node.material, world[i], &view_proj, cam.fov);
        }
        gl.depth_mask(true);
    }

    fn set_lights(&self, backdrop: &Backdrop) {
        let gl = &self.gl;
        let p = &self.mesh;
        let l = &backdrop.lights;
        gl.uniform3fv_with_f32_array(p.ambient.as_ref(), &l.ambient.color.scaled(l.ambient.intensity).0);
        gl.uniform3fv_with_f32_array(
            p.dir_color.as_ref(),
            &l.directional.color.scaled(l.directional.intensity).0,
        );
        gl.uniform3fv_with_f32_array(p.dir_to_light.as_ref(), &(-l.directional.direction()).to_array());
        gl.uniform3fv_with_f32_array(p.point_color.as_ref(), &l.point.color.scaled(l.point.intensity).0);
        gl.uniform3fv_with_f32_array(p.point_pos.as_ref(), &l.point.position.to_array());
        gl.uniform1f(p.point_range.as_ref(), l.point.range);
    }

    fn draw_mesh(&self, m: &GpuMesh, material: &Material, model: Mat4) {
        let gl = &self.gl;
        let p = &self.mesh;
        let normal = Mat3::from_mat4(model).inverse().transpose();

        gl.uniform_matrix4fv_with_f32_array(p.model.as_ref(), false, &model.to_cols_array());
        gl.uniform_matrix3fv_with_f32_array(p.normal_matrix.as_ref(), false, &normal.to_cols_array());
        gl.uniform3fv_with_f32_array(p.color.as_ref(), &material.color.0);
        gl.uniform1f(p.opacity.as_ref(), material.opacity);
        gl.uniform3fv_with_f32_array(
            p.emissive.as_ref(),
            &material.emissive.scaled(material.emissive_intensity).0,
        );

        let texture = material.label.and_then(|i| self.labels.get(i)).and_then(Option::as_ref);
        gl.uniform1i(p.textured.as_ref(), texture.is_some() as i32);
        // label boards and plain lines ignore lighting
        gl.uniform1i(p.lit.as_ref(), (texture.is_none() && !m.lines) as i32);
        if let Some(tex) = texture {
            gl.active_texture(GL::TEXTURE0);
            gl.bind_texture(GL::TEXTURE_2D, Some(tex));
            gl.uniform1i(p.texture.as_ref(), 0);
        }

        match (&m.edges, material.wireframe, m.lines) {
            (_, _, true) => {
                gl.bind_vertex_array(Some(&m.vao));
                gl.draw_arrays(GL::LINES, 0, m.count);
            }
            (Some((vao, count)), true, false) => {
                gl.bind_vertex_array(Some(vao));
                gl.draw_elements_with_i32(GL::LINES, *count, GL::UNSIGNED_INT, 0);
            }
            _ => {
                gl.bind_vertex_array(Some(&m.vao));
                gl.draw_elements_with_i32(GL::TRIANGLES, m.count, GL::UNSIGNED_INT, 0);
            }
        }
        gl.bind_vertex_array(None);
    }

    fn draw_points(&self, backdrop: &Backdrop, material: &Material, model: Mat4, view_proj: &[f32; 16], fov: f32) {
        let gl = &self.gl;
        let p = &self.points;
        let positions = js_sys::Float32Array::from(backdrop.particles.positions());

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.cloud.positions));
        gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &positions);

        gl.use_program(Some(&p.program));
        gl.uniform_matrix4fv_with_f32_array(p.model.as_ref(), false, &model.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(p.view_proj.as_ref(), false, view_proj);
        let scale = POINT_SCALE * self.point_scale / (2.0 * (fov.to_radians() / 2.0).tan());
        gl.uniform1f(p.scale.as_ref(), scale);
        gl.uniform1f(p.opacity.as_ref(), material.opacity);

        gl.depth_mask(false);
        gl.bind_vertex_array(Some(&self.cloud.vao));
        gl.draw_arrays(GL::POINTS, 0, self.cloud.count);
        gl.bind_vertex_array(None);
    }
}

impl MeshProgram {
    fn new(gl: &GL) -> Result<Self, BackdropError> {
        let program = link(gl, MESH_VS, MESH_FS)?;
        let u = |name: &str| gl.get_uniform_location(&program, name);
        Ok(Self {
            model: u("u_model"),
            view_proj: u("u_view_proj"),
            normal_matrix: u("u_normal_matrix"),
            color: u("u_color"),
            opacity: u("u_opacity"),
            emissive: u("u_emissive"),
            ambient: u("u_ambient"),
            dir_color: u("u_dir_color"),
            dir_to_light: u("u_dir_to_light"),
            point_color: u("u_point_color"),
            point_pos: u("u_point_pos"),
            point_range: u("u_point_range"),
            lit: u("u_lit"),
            textured: u("u_textured"),
            texture: u("u_texture"),
            program,
        })
    }
}

impl PointsProgram {
    fn new(gl: &GL) -> Result<Self, BackdropError> {
        let program = link(gl, POINTS_VS, POINTS_FS)?;
        let u = |name: &str| gl.get_uniform_location(&program, name);
        Ok(Self {
            model: u("u_model"),
            view_proj: u("u_view_proj"),
            scale: u("u_scale"),
            opacity: u("u_opacity"),
            program,
        })
    }
}

fn compile(gl: &GL, kind: u32, src: &str) -> Result<WebGlShader, BackdropError> {
    let shader = gl.create_shader(kind).ok_or_else(|| BackdropError::Gpu("create_shader".into()))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(BackdropError::Gpu(format!("shader compile: {}", log)))
    }
}

fn link(gl: &GL, vs: &str, fs: &str) -> Result<WebGlProgram, BackdropError> {
    let vs = compile(gl, GL::VERTEX_SHADER, vs)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, fs)?;
    let program = gl.create_program().ok_or_else(|| BackdropError::Gpu("create_program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(BackdropError::Gpu(format!(
            "program link: {}",
            gl.get_program_info_log(&program).unwrap_or_default()
        )))
    }
}

fn array_buffer(gl: &GL, location: u32, size: i32, data: &[f32], usage: u32) -> Result<WebGlBuffer, BackdropError> {
    let buf = gl.create_buffer().ok_or_else(|| BackdropError::Gpu("create_buffer".into()))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buf));
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &js_sys::Float32Array::from(data), usage);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
    Ok(buf)
}

fn element_buffer(gl: &GL, indices: &[u32]) -> Result<WebGlBuffer, BackdropError> {
    let buf = gl.create_buffer().ok_or_else(|| BackdropError::Gpu("create_buffer".into()))?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buf));
    gl.buffer_data_with_array_buffer_view(
        GL::ELEMENT_ARRAY_BUFFER,
        &js_sys::Uint32Array::from(indices),
        GL::STATIC_DRAW,
    );
    Ok(buf)
}

fn vertex_array(gl: &GL) -> Result<WebGlVertexArrayObject, BackdropError> {
    let vao = gl.create_vertex_array().ok_or_else(|| BackdropError::Gpu("create_vertex_array".into()))?;
    gl.bind_vertex_array(Some(&vao));
    Ok(vao)
}

fn flatten<const N: usize>(v: &[[f32; N]]) -> Vec<f32> {
    v.iter().flatten().copied().collect()
}

fn upload_geometry(gl: &GL, geometry: &Geometry, wired: bool) -> Result<GpuMesh, BackdropError> {
    match geometry {
        Geometry::Lines(points) => {
            let vao = vertex_array(gl)?;
            array_buffer(gl, 0, 3, &flatten(points), GL::STATIC_DRAW)?;
            gl.bind_vertex_array(None);
            Ok(GpuMesh { vao, count: points.len() as i32, edges: None, lines: true })
        }
        Geometry::Mesh(m) => {
            let positions = flatten(&m.positions);
            let normals = flatten(&m.normals);
            let uvs = flatten(&m.uvs);
            let attach = |indices: &[u32]| -> Result<WebGlVertexArrayObject, BackdropError> {
                let vao = vertex_array(gl)?;
                array_buffer(gl, 0, 3, &positions, GL::STATIC_DRAW)?;
                array_buffer(gl, 1, 3, &normals, GL::STATIC_DRAW)?;
                array_buffer(gl, 2, 2, &uvs, GL::STATIC_DRAW)?;
                element_buffer(gl, indices)?;
                gl.bind_vertex_array(None);
                Ok(vao)
            };

            let vao = attach(&m.indices)?;
            let edges = if wired {
                let e = m.edges();
                Some((attach(&e)?, e.len() as i32))
            } else {
                None
            };
            Ok(GpuMesh { vao, count: m.indices.len() as i32, edges, lines: false })
        }
    }
}

fn upload_points(gl: &GL, backdrop: &Backdrop) -> Result<PointsBuffers, BackdropError> {
    let cloud = &backdrop.particles;
    let vao = vertex_array(gl)?;
    let positions = array_buffer(gl, 0, 3, cloud.positions(), GL::DYNAMIC_DRAW)?;
    array_buffer(gl, 1, 3, cloud.colors(), GL::STATIC_DRAW)?;
    array_buffer(gl, 2, 1, cloud.sizes(), GL::STATIC_DRAW)?;
    gl.bind_vertex_array(None);
    Ok(PointsBuffers { vao, positions, count: cloud.len() as i32 })
}
