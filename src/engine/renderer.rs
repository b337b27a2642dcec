use wasm_bindgen::prelude::*;
use web_sys::{WebGlRenderingContext, WebGlProgram, WebGlBuffer, WebGlUniformLocation, HtmlCanvasElement, WebGlTexture, HtmlImageElement};
use nalgebra::{Matrix4, Vector3};
use crate::engine::mesh::Mesh;
use wasm_bindgen::JsCast;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aNormal;
    attribute vec2 aTexCoord;
    uniform mat4 uModel;
    uniform mat4 uViewProjection;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    varying vec2 vTexCoord;
    void main() {
        vec4 world = uModel * vec4(aPosition, 1.0);
        gl_Position = uViewProjection * world;
        gl_PointSize = 1.5;
        vWorldPos = world.xyz;
        vNormal = (uModel * vec4(aNormal, 0.0)).xyz;
        vTexCoord = aTexCoord;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    varying vec2 vTexCoord;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform vec3 uUniformColor;
    uniform bool uLit;

    void main() {
        vec3 color = uUniformColor;
        float alpha = 1.0;
        if (uUseTexture == 1) {
            vec4 texel = texture2D(uTexture, vTexCoord);
            color = texel.rgb;
            alpha *= texel.a;
        }

        if (uLit) {
            // Point light at the origin (the sun) plus a flat ambient term
            vec3 n = normalize(vNormal);
            vec3 toLight = normalize(-vWorldPos);
            float diffuse = max(dot(n, toLight), 0.0);
            color *= 0.5 + 1.5 * diffuse;
        }

        gl_FragColor = vec4(color, alpha);
    }
"#;

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    program: WebGlProgram,
    u_model_location: WebGlUniformLocation,
    u_view_projection_location: WebGlUniformLocation,
    u_use_texture_location: WebGlUniformLocation,
    u_uniform_color_location: WebGlUniformLocation,
    u_lit_location: WebGlUniformLocation,
    dynamic_vertex_buffer: WebGlBuffer,
    dynamic_index_buffer: WebGlBuffer,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let dynamic_vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let dynamic_index_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        let u_model_location = gl.get_uniform_location(&program, "uModel")
            .ok_or("Failed to get uModel location")?;
        let u_view_projection_location = gl.get_uniform_location(&program, "uViewProjection")
            .ok_or("Failed to get uViewProjection location")?;
        let u_use_texture_location = gl.get_uniform_location(&program, "uUseTexture")
            .ok_or("Failed to get uUseTexture location")?;
        let u_uniform_color_location = gl.get_uniform_location(&program, "uUniformColor")
            .ok_or("Failed to get uUniformColor location")?;
        let u_lit_location = gl.get_uniform_location(&program, "uLit")
            .ok_or("Failed to get uLit location")?;

        Ok(Renderer {
            gl,
            program,
            u_model_location,
            u_view_projection_location,
            u_use_texture_location,
            u_uniform_color_location,
            u_lit_location,
            dynamic_vertex_buffer,
            dynamic_index_buffer,
        })
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn enable_blend(&self) {
        self.gl.enable(WebGlRenderingContext::BLEND);
        self.gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE_MINUS_SRC_ALPHA);
    }

    pub fn disable_blend(&self) {
        self.gl.disable(WebGlRenderingContext::BLEND);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas().and_then(|c| c.dyn_into::<HtmlCanvasElement>().ok())
    }

    pub fn draw_mesh(
        &self,
        mesh: &Mesh,
        position: &Vector3<f32>,
        rotation_x: f32,
        rotation_y: f32,
        texture: Option<&WebGlTexture>,
        lit: bool,
        view_projection: &Matrix4<f32>,
    ) {
        if let Some(tex) = texture {
            self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
            self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(tex));
            self.gl.uniform1i(Some(&self.u_use_texture_location), 1);
        } else {
            self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
            self.gl.uniform3f(Some(&self.u_uniform_color_location), 1.0, 1.0, 1.0);
        }
        self.gl.uniform1i(Some(&self.u_lit_location), lit as i32);

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW
            );
        }

        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.dynamic_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::DYNAMIC_DRAW
            );
        }

        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let normal_loc = self.gl.get_attrib_location(&self.program, "aNormal") as u32;
        let tex_loc = self.gl.get_attrib_location(&self.program, "aTexCoord") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, 32, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);

        self.gl.vertex_attrib_pointer_with_i32(normal_loc, 3, WebGlRenderingContext::FLOAT, false, 32, 12);
        self.gl.enable_vertex_attrib_array(normal_loc);

        self.gl.vertex_attrib_pointer_with_i32(tex_loc, 2, WebGlRenderingContext::FLOAT, false, 32, 24);
        self.gl.enable_vertex_attrib_array(tex_loc);

        let model = Matrix4::new_translation(position)
            * Matrix4::from_euler_angles(rotation_x, rotation_y, 0.0);
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_model_location), false, model.as_slice());
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_view_projection_location), false, view_projection.as_slice());

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0
        );
    }

    pub fn draw_line_loop(&self, vertices: &[f32], r: f32, g: f32, b: f32, view_projection: &Matrix4<f32>) {
        self.draw_flat(WebGlRenderingContext::LINE_LOOP, vertices, r, g, b, view_projection);
    }

    pub fn draw_points(&self, vertices: &[f32], r: f32, g: f32, b: f32, view_projection: &Matrix4<f32>) {
        self.draw_flat(WebGlRenderingContext::POINTS, vertices, r, g, b, view_projection);
    }

    /// Untextured, unlit primitives from a flat xyz position list.
    fn draw_flat(&self, mode: u32, vertices: &[f32], r: f32, g: f32, b: f32, view_projection: &Matrix4<f32>) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW
            );
        }

        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let normal_loc = self.gl.get_attrib_location(&self.program, "aNormal") as u32;
        let tex_loc = self.gl.get_attrib_location(&self.program, "aTexCoord") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);

        self.gl.disable_vertex_attrib_array(normal_loc);
        self.gl.disable_vertex_attrib_array(tex_loc);

        self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
        self.gl.uniform1i(Some(&self.u_lit_location), 0);
        self.gl.uniform3f(Some(&self.u_uniform_color_location), r, g, b);

        let model = Matrix4::identity();
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_model_location), false, model.as_slice());
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_view_projection_location), false, view_projection.as_slice());

        self.gl.draw_arrays(mode, 0, (vertices.len() / 3) as i32);
    }

    pub fn create_texture(&self, url: &str) -> Result<WebGlTexture, JsValue> {
        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));

        // Put a single pixel in the texture so we can use it immediately.
        // If the image never loads, the surface stays this flat grey.
        let level = 0;
        let internal_format = WebGlRenderingContext::RGBA as i32;
        let width = 1;
        let height = 1;
        let border = 0;
        let src_format = WebGlRenderingContext::RGBA;
        let src_type = WebGlRenderingContext::UNSIGNED_BYTE;
        let pixel = [96u8, 96, 96, 255];
        self.gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            WebGlRenderingContext::TEXTURE_2D, level, internal_format, width, height, border, src_format, src_type, Some(&pixel)
        )?;

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let gl = self.gl.clone();
        let texture_clone = texture.clone();
        let img_clone = img.clone();

        let onload = Closure::wrap(Box::new(move || {
            gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture_clone));
            if gl.tex_image_2d_with_u32_and_u32_and_image(
                WebGlRenderingContext::TEXTURE_2D, 0, WebGlRenderingContext::RGBA as i32, WebGlRenderingContext::RGBA, WebGlRenderingContext::UNSIGNED_BYTE, &img_clone
            ).is_err() {
                return;
            }

            // Check if power of 2
            if is_power_of_2(img_clone.width()) && is_power_of_2(img_clone.height()) {
                gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
            } else {
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);
            }
        }) as Box<dyn FnMut()>);

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        img.set_src(url);

        Ok(texture)
    }
}

fn is_power_of_2(value: u32) -> bool {
    (value & (value - 1)) == 0
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
