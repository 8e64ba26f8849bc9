//! Access and property flag bits for classes, members, and inner-class
//! records. Stored as the raw bitmask; unknown bits are ignored for
//! forward compatibility. Three bit positions are context-dependent:
//! 0x0020 is ACC_SUPER on a class but ACC_SYNCHRONIZED on a method,
//! 0x0040 is ACC_VOLATILE on a field but ACC_BRIDGE on a method, and
//! 0x0080 is ACC_TRANSIENT on a field but ACC_VARARGS on a method.

/// Declared public; may be accessed from outside its package.
pub const ACC_PUBLIC: u16 = 0x0001;
/// Declared private; accessible only within the defining class.
pub const ACC_PRIVATE: u16 = 0x0002;
/// Declared protected; may be accessed within subclasses.
pub const ACC_PROTECTED: u16 = 0x0004;
/// Declared static.
pub const ACC_STATIC: u16 = 0x0008;
/// Declared final.
pub const ACC_FINAL: u16 = 0x0010;
/// Declared synchronized; invocation is wrapped by a monitor use.
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
/// Treat superclass methods specially under invokespecial.
pub const ACC_SUPER: u16 = 0x0020;
/// Declared volatile; cannot be cached.
pub const ACC_VOLATILE: u16 = 0x0040;
/// A bridge method, generated by the compiler.
pub const ACC_BRIDGE: u16 = 0x0040;
/// Declared transient; skipped by persistent object managers.
pub const ACC_TRANSIENT: u16 = 0x0080;
/// Declared with a variable number of arguments.
pub const ACC_VARARGS: u16 = 0x0080;
/// Declared native; implemented outside the Java language.
pub const ACC_NATIVE: u16 = 0x0100;
/// Is an interface, not a class.
pub const ACC_INTERFACE: u16 = 0x0200;
/// Declared abstract; must not be instantiated.
pub const ACC_ABSTRACT: u16 = 0x0400;
/// Declared strictfp.
pub const ACC_STRICT: u16 = 0x0800;
/// Declared synthetic; not present in the source code.
pub const ACC_SYNTHETIC: u16 = 0x1000;
/// Declared as an annotation interface.
pub const ACC_ANNOTATION: u16 = 0x2000;
/// Declared as an enum class.
pub const ACC_ENUM: u16 = 0x4000;
/// Is a module, not a class or interface.
pub const ACC_MODULE: u16 = 0x8000;
