//! # Shader Programs
//!
//! CPU-side shader program objects and the built-in catalog they are
//! resolved from. A program carries its name, the detail tier it implements
//! and the GLSL sources for its two stages; compiling and binding the
//! program is the job of the graphics backend that consumes the draw
//! requests.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EngineError;

/// Shared handle to a shader program. Repeated pool lookups with the same
/// name return clones of the same handle.
pub type ShaderHandle = Rc<ShaderProgram>;

/// The shading technique a program implements, from most to least detailed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShadeDetail {
    /// Parallax relief mapping, the near tier.
    Relief,
    /// Normal perturbation from the relief texture, the middle tier.
    Bump,
    /// Plain per-vertex diffuse shading, the far tier.
    Gouraud,
}

/// A shader program description resolved from the built-in catalog.
pub struct ShaderProgram {
    name: String,
    detail: ShadeDetail,
    vertex_source: &'static str,
    fragment_source: &'static str,
}

impl ShaderProgram {
    /// The catalog name this program was resolved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The detail tier this program implements.
    pub fn detail(&self) -> ShadeDetail {
        self.detail
    }

    /// GLSL source of the vertex stage.
    pub fn vertex_source(&self) -> &'static str {
        self.vertex_source
    }

    /// GLSL source of the fragment stage.
    pub fn fragment_source(&self) -> &'static str {
        self.fragment_source
    }
}

struct CatalogEntry {
    detail: ShadeDetail,
    vertex: &'static str,
    fragment: &'static str,
}

/// Shared vertex stage: all tiers transform the same unit quad.
const QUAD_VERTEX: &str = r#"
#version 330 core
layout (location = 0) in vec3 inPosition;
layout (location = 2) in vec2 inTexCoord;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

out vec2 texCoord;
out vec3 fragPosition;

void main()
{
    vec4 worldPosition = model * vec4(inPosition, 1.0);
    gl_Position = projection * view * worldPosition;
    fragPosition = worldPosition.xyz;
    texCoord = inTexCoord;
}
"#;

const RELIEF_FRAGMENT: &str = r#"
#version 330 core
in vec2 texCoord;
in vec3 fragPosition;
out vec4 outColor;

uniform sampler2D inputTex;
uniform sampler2D reliefTex;
uniform vec4 tint;
uniform float ambient;
uniform float diffuse;
uniform float specular;
uniform vec4 lightColor;
uniform vec4 lightSource;

void main()
{
    vec2 shifted = texCoord + texture(reliefTex, texCoord).ra * 0.0625;
    vec3 normal = normalize(texture(reliefTex, shifted).rgb * 2.0 - 1.0);
    float lambert = max(dot(normal, -lightSource.xyz), 0.0);
    vec4 base = texture(inputTex, shifted) * tint;
    outColor = base * (ambient + diffuse * lambert) * lightColor
             + vec4(specular * pow(lambert, 8.0));
}
"#;

const BUMP_FRAGMENT: &str = r#"
#version 330 core
in vec2 texCoord;
out vec4 outColor;

uniform sampler2D inputTex;
uniform sampler2D reliefTex;
uniform vec4 tint;
uniform float ambient;
uniform float diffuse;
uniform vec4 lightColor;
uniform vec4 lightSource;

void main()
{
    vec3 normal = normalize(texture(reliefTex, texCoord).rgb * 2.0 - 1.0);
    float lambert = max(dot(normal, -lightSource.xyz), 0.0);
    outColor = texture(inputTex, texCoord) * tint
             * (ambient + diffuse * lambert) * lightColor;
}
"#;

const SIMPLE_FRAGMENT: &str = r#"
#version 330 core
in vec2 texCoord;
out vec4 outColor;

uniform sampler2D inputTex;
uniform vec4 tint;
uniform float ambient;
uniform float diffuse;
uniform vec4 lightColor;

void main()
{
    outColor = texture(inputTex, texCoord) * tint
             * (ambient + diffuse) * lightColor;
}
"#;

/// Built-in program catalog, keyed by the names the renderer asks for.
static SHADER_CATALOG: phf::Map<&'static str, CatalogEntry> = phf::phf_map! {
    "relief" => CatalogEntry {
        detail: ShadeDetail::Relief,
        vertex: QUAD_VERTEX,
        fragment: RELIEF_FRAGMENT,
    },
    "bump" => CatalogEntry {
        detail: ShadeDetail::Bump,
        vertex: QUAD_VERTEX,
        fragment: BUMP_FRAGMENT,
    },
    "simple" => CatalogEntry {
        detail: ShadeDetail::Gouraud,
        vertex: QUAD_VERTEX,
        fragment: SIMPLE_FRAGMENT,
    },
};

/// Load-once cache of shader programs.
pub struct ShaderPool {
    programs: HashMap<String, ShaderHandle>,
}

impl ShaderPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        ShaderPool {
            programs: HashMap::new(),
        }
    }

    /// Resolves `name` from the catalog, caching the result. Repeated calls
    /// with the same name return the same handle.
    pub fn get(&mut self, name: &str) -> Result<ShaderHandle, EngineError> {
        if let Some(program) = self.programs.get(name) {
            return Ok(program.clone());
        }
        let entry = SHADER_CATALOG
            .get(name)
            .ok_or_else(|| EngineError::UnknownShader(name.to_string()))?;
        let program = Rc::new(ShaderProgram {
            name: name.to_string(),
            detail: entry.detail,
            vertex_source: entry.vertex,
            fragment_source: entry.fragment,
        });
        self.programs.insert(name.to_string(), program.clone());
        Ok(program)
    }
}

impl Default for ShaderPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_idempotent() {
        let mut pool = ShaderPool::new();
        let first = pool.get("bump").unwrap();
        let second = pool.get("bump").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.detail(), ShadeDetail::Bump);
    }

    #[test]
    fn unknown_name_is_an_error_naming_the_case() {
        let mut pool = ShaderPool::new();
        let err = pool.get("volumetric").unwrap_err();
        assert!(err.to_string().contains("volumetric"));
    }

    #[test]
    fn catalog_covers_the_three_tiers() {
        let mut pool = ShaderPool::new();
        assert_eq!(pool.get("relief").unwrap().detail(), ShadeDetail::Relief);
        assert_eq!(pool.get("bump").unwrap().detail(), ShadeDetail::Bump);
        assert_eq!(pool.get("simple").unwrap().detail(), ShadeDetail::Gouraud);
        assert!(!pool.get("simple").unwrap().vertex_source().is_empty());
        assert!(!pool.get("simple").unwrap().fragment_source().is_empty());
    }
}
