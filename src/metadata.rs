//! Package metadata constants generated by the build script.

include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
