use super::*;

#[test]
fn test_default_assumes_npot() {
    let caps = DeviceCapabilities::default();
    assert!(caps.supports(DeviceFeatures::NPOT_TEXTURES));
    assert_eq!(caps.valid_texture_size(500), Some(500));
    assert_eq!(caps.valid_texture_size(u32::MAX), Some(u32::MAX));
}

#[test]
fn test_valid_size_without_npot() {
    let caps = DeviceCapabilities {
        features: DeviceFeatures::all() - DeviceFeatures::NPOT_TEXTURES,
        ..DeviceCapabilities::default()
    };
    assert_eq!(caps.valid_texture_size(500), Some(512));
    assert_eq!(caps.valid_texture_size(512), Some(512));
    assert_eq!(caps.valid_texture_size(1), Some(1));
    assert_eq!(caps.valid_texture_size(513), Some(1024));
}

#[test]
fn test_valid_size_without_npot_overflow() {
    let caps = DeviceCapabilities {
        features: DeviceFeatures::empty(),
        ..DeviceCapabilities::default()
    };
    assert_eq!(caps.valid_texture_size(1 << 31), Some(1 << 31));
    assert_eq!(caps.valid_texture_size((1 << 31) + 1), None);
    assert_eq!(caps.valid_texture_size(u32::MAX), None);
}

#[test]
fn test_supports_requires_all_flags() {
    let caps = DeviceCapabilities {
        features: DeviceFeatures::BLEND_MINMAX,
        ..DeviceCapabilities::default()
    };
    assert!(caps.supports(DeviceFeatures::BLEND_MINMAX));
    assert!(!caps.supports(DeviceFeatures::BLEND_MINMAX | DeviceFeatures::BLEND_SUBTRACT));
}
