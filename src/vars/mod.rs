//! Configuration variables that a map can override

use std::collections::BTreeMap;
use std::io::Read;

use crate::core::{Error, Result};
use crate::format::wire::{get_float, get_int, get_string, put_float, put_int, put_string};

/// Variable flags
pub mod flags {
    /// The map may override this variable
    pub const OVERRIDE: u32 = 1 << 0;
    pub const READONLY: u32 = 1 << 1;
    /// Changed from its default by the current map
    pub const OVERRIDDEN: u32 = 1 << 2;
}

/// Typed variable value
#[derive(Clone, Debug, PartialEq)]
pub enum VarValue {
    Int(i32),
    Float(f32),
    Str(String),
}

impl VarValue {
    /// Wire type tag: 0 = int, 1 = float, 2 = string
    pub fn type_tag(&self) -> i32 {
        match self {
            VarValue::Int(_) => 0,
            VarValue::Float(_) => 1,
            VarValue::Str(_) => 2,
        }
    }

    fn same_type(&self, other: &VarValue) -> bool {
        self.type_tag() == other.type_tag()
    }
}

/// A variable as stored in the map file
#[derive(Clone, Debug, PartialEq)]
pub struct MapVar {
    pub name: String,
    pub value: VarValue,
}

impl MapVar {
    /// TYPE NAME VALUE
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        put_int(buf, self.value.type_tag())?;
        put_string(buf, &self.name)?;
        match &self.value {
            VarValue::Int(i) => put_int(buf, *i)?,
            VarValue::Float(f) => put_float(buf, *f)?,
            VarValue::Str(s) => put_string(buf, s)?,
        }
        Ok(())
    }

    pub fn decode(reader: &mut impl Read) -> Result<Self> {
        let format_err = |e: std::io::Error| Error::Format(format!("variable: {}", e));
        let tag = get_int(reader).map_err(format_err)?;
        let name = get_string(reader).map_err(format_err)?;
        let value = match tag {
            0 => VarValue::Int(get_int(reader).map_err(format_err)?),
            1 => VarValue::Float(get_float(reader).map_err(format_err)?),
            2 => VarValue::Str(get_string(reader).map_err(format_err)?),
            other => {
                return Err(Error::Format(format!("unknown variable type {} for {}", other, name)));
            }
        };
        Ok(Self { name, value })
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Var {
    value: VarValue,
    flags: u32,
}

/// Named variables with override tracking, enumerated in name order
#[derive(Clone, Debug, Default)]
pub struct VarRegistry {
    vars: BTreeMap<String, Var>,
}

impl VarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with its default value
    pub fn register(&mut self, name: impl Into<String>, value: VarValue, flags: u32) {
        self.vars.insert(name.into(), Var { value, flags });
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.vars.get(name).map(|v| &v.value)
    }

    pub fn flags(&self, name: &str) -> Option<u32> {
        self.vars.get(name).map(|v| v.flags)
    }

    /// Assign a value; overridable variables remember that the map changed them
    pub fn set(&mut self, name: &str, value: VarValue) -> Result<()> {
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| Error::Config(format!("unknown variable {}", name)))?;
        if var.flags & flags::READONLY != 0 {
            return Err(Error::Config(format!("variable {} is read-only", name)));
        }
        if !var.value.same_type(&value) {
            return Err(Error::Config(format!("type mismatch assigning {}", name)));
        }
        if var.value != value && var.flags & flags::OVERRIDE != 0 {
            var.flags |= flags::OVERRIDDEN;
        }
        var.value = value;
        Ok(())
    }

    /// Variables the map file must carry: overridable, overridden, writable
    pub fn exported(&self) -> Vec<MapVar> {
        self.vars
            .iter()
            .filter(|(_, v)| {
                v.flags & flags::OVERRIDE != 0
                    && v.flags & flags::OVERRIDDEN != 0
                    && v.flags & flags::READONLY == 0
            })
            .map(|(name, v)| MapVar {
                name: name.clone(),
                value: v.value.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> VarRegistry {
        let mut vars = VarRegistry::new();
        vars.register("fogcolour", VarValue::Int(0x8099B3), flags::OVERRIDE);
        vars.register("fog", VarValue::Int(4000), flags::OVERRIDE);
        vars.register("skybox", VarValue::Str(String::new()), flags::OVERRIDE);
        vars.register("ambientscale", VarValue::Float(1.0), flags::OVERRIDE);
        vars.register("maxfps", VarValue::Int(200), 0);
        vars.register("mapversion", VarValue::Int(1), flags::OVERRIDE | flags::READONLY);
        vars
    }

    #[test]
    fn test_only_overridden_are_exported() {
        let mut vars = registry();
        assert!(vars.exported().is_empty());

        vars.set("fog", VarValue::Int(2500)).unwrap();
        vars.set("skybox", VarValue::Str("skyboxes/dusk".into())).unwrap();
        vars.set("maxfps", VarValue::Int(60)).unwrap();

        let exported = vars.exported();
        let names: Vec<&str> = exported.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["fog", "skybox"]);
        assert_eq!(exported[0].value, VarValue::Int(2500));
    }

    #[test]
    fn test_unchanged_assignment_is_not_an_override() {
        let mut vars = registry();
        vars.set("fog", VarValue::Int(4000)).unwrap();
        assert!(vars.exported().is_empty());
    }

    #[test]
    fn test_readonly_rejected() {
        let mut vars = registry();
        assert!(vars.set("mapversion", VarValue::Int(2)).is_err());
        assert!(vars.set("nope", VarValue::Int(2)).is_err());
        assert!(vars.set("fog", VarValue::Float(2.0)).is_err());
    }

    #[test]
    fn test_readonly_never_exported() {
        let mut vars = VarRegistry::new();
        vars.register("locked", VarValue::Int(1), flags::OVERRIDE | flags::OVERRIDDEN | flags::READONLY);
        assert!(vars.exported().is_empty());
    }

    #[test]
    fn test_var_wire_layout() {
        let var = MapVar { name: "fog".into(), value: VarValue::Int(300) };
        let mut buf = Vec::new();
        var.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0, 3, b'f', b'o', b'g', 0x80, 0x2C, 0x01]);
        assert_eq!(MapVar::decode(&mut buf.as_slice()).unwrap(), var);
    }

    #[test]
    fn test_var_decode_all_types() {
        let vars = [
            MapVar { name: "a".into(), value: VarValue::Float(0.25) },
            MapVar { name: "b".into(), value: VarValue::Str("x y".into()) },
        ];
        let mut buf = Vec::new();
        for var in &vars {
            var.encode(&mut buf).unwrap();
        }
        let mut reader = buf.as_slice();
        for var in &vars {
            assert_eq!(&MapVar::decode(&mut reader).unwrap(), var);
        }
    }

    #[test]
    fn test_unknown_type_tag() {
        let buf = [7u8, 1, b'x', 0];
        assert!(matches!(MapVar::decode(&mut buf.as_slice()), Err(Error::Format(_))));
    }
}
