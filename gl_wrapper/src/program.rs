use gl::types::{GLint, GLuint};
use std::ffi::{c_char, CString, NulError};
use std::fmt::{Display, Formatter};
use thiserror::Error;

const INFO_LOG_LEN: usize = 1024;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = Shader::compile(ShaderStage::Vertex, self.vert)?;
        let frag = Shader::compile(ShaderStage::Fragment, self.frag)?;

        let mut success: GLint = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert.id);
            gl::AttachShader(program, frag.id);
            gl::LinkProgram(program);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != gl::TRUE as GLint {
                let mut buf = [0_u8; INFO_LOG_LEN];

                gl::GetProgramInfoLog(
                    program,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(PBError::Linking(info_log(&buf)));
            }

            gl::DetachShader(program, vert.id);
            gl::DetachShader(program, frag.id);

            Ok(Program { id: program })
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(&self) -> GLuint {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Compiled stage, deleted as soon as it goes out of scope. A program keeps
/// its own reference to attached shaders, so dropping after linking is fine.
struct Shader {
    id: GLuint,
}

impl Shader {
    fn compile(stage: ShaderStage, src: &str) -> Result<Self, PBError> {
        let src = CString::new(src).map_err(|e| PBError::InvalidSource(stage, e))?;
        let mut success: GLint = 0;

        unsafe {
            let shader = Shader {
                id: gl::CreateShader(stage.gl_kind()),
            };

            gl::ShaderSource(
                shader.id,
                1,
                (&src.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );

            gl::CompileShader(shader.id);
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, (&mut success) as *mut i32);
            if success != gl::TRUE as GLint {
                let mut buf = [0_u8; INFO_LOG_LEN];

                gl::GetShaderInfoLog(
                    shader.id,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );

                return Err(PBError::Compilation {
                    stage,
                    log: info_log(&buf),
                });
            }

            Ok(shader)
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

/// Driver logs are NUL terminated inside a fixed buffer.
fn info_log(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{stage} shader failed to compile: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program failed to link: {0}")]
    Linking(String),
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(ShaderStage, #[source] NulError),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn attrib_location(&self, name: &str) -> Option<GLuint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(self.id, name.as_ptr()) };

        GLuint::try_from(location).ok()
    }

    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        (location >= 0).then_some(location)
    }

    /// Program has to be in use.
    pub fn set_vec2(&self, location: GLint, x: f32, y: f32) {
        unsafe { gl::Uniform2f(location, x, y) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let mut buf = [0_u8; 16];
        buf[..6].copy_from_slice(b"error\n");

        assert_eq!(info_log(&buf), "error");
    }

    #[test]
    fn info_log_without_nul() {
        assert_eq!(info_log(b"full buffer"), "full buffer");
    }

    #[test]
    fn nul_in_vertex_source_fails_before_compiling() {
        let res = ProgramBuilder::new("a\0b", "").build();

        assert!(matches!(
            res,
            Err(PBError::InvalidSource(ShaderStage::Vertex, _))
        ));
    }

    #[test]
    fn invalid_source_names_stage() {
        let err = ProgramBuilder::new("a\0b", "").build().err().unwrap();

        assert_eq!(err.to_string(), "vertex shader source contains a NUL byte");
    }

    #[test]
    fn compile_error_names_stage() {
        let err = PBError::Compilation {
            stage: ShaderStage::Fragment,
            log: "0:1: syntax error".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: 0:1: syntax error"
        );
    }
}
