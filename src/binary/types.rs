use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    I32,       // 0x7F
    I64,       // 0x7E
    F32,       // 0x7D
    F64,       // 0x7C
    V128,      // 0x7B
    FuncRef,   // 0x70
    ExternRef, // 0x6F
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
            ValueType::FuncRef => "funcref",
            ValueType::ExternRef => "externref",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<ValueType>,
    pub returns: Vec<ValueType>,
}

/// Element type of a table; tables hold references only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefType {
    Func,   // 0x70
    Extern, // 0x6F
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefType::Func => f.write_str("funcref"),
            RefType::Extern => f.write_str("externref"),
        }
    }
}

/// Address-space width of a memory. `I64` marks a memory64 memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    I32,
    I64,
}

/// Size bounds shared by memories and tables. `shared` and `index` only
/// carry meaning for memories; the memory type is this record as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub min: u64,
    pub max: Option<u64>,
    pub shared: bool,
    pub index: IndexType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableType {
    pub element: RefType,
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalType {
    pub value: ValueType,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDesc {
    Func(FuncType),
    Table(TableType),
    Memory(Limits),
    Global(GlobalType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub name: String,
    pub desc: ImportDesc,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.module, self.name, self.desc)
    }
}

impl fmt::Display for ImportDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportDesc::Func(func_type) => {
                f.write_str("func")?;
                if !func_type.params.is_empty() {
                    f.write_str(" (param")?;
                    for param in &func_type.params {
                        write!(f, " {param}")?;
                    }
                    f.write_str(")")?;
                }
                if !func_type.returns.is_empty() {
                    f.write_str(" (result")?;
                    for ret in &func_type.returns {
                        write!(f, " {ret}")?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
            ImportDesc::Table(table) => {
                write!(f, "table {}", table.min)?;
                if let Some(max) = table.max {
                    write!(f, " {max}")?;
                }
                write!(f, " {}", table.element)
            }
            ImportDesc::Memory(limits) => {
                f.write_str("memory")?;
                if limits.index == IndexType::I64 {
                    f.write_str(" i64")?;
                }
                write!(f, " {}", limits.min)?;
                if let Some(max) = limits.max {
                    write!(f, " {max}")?;
                }
                if limits.shared {
                    f.write_str(" shared")?;
                }
                Ok(())
            }
            ImportDesc::Global(global) => {
                if global.mutable {
                    write!(f, "global (mut {})", global.value)
                } else {
                    write!(f, "global {}", global.value)
                }
            }
        }
    }
}
