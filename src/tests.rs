// swapman/src/tests.rs
//
//! Unit tests.

use crate::context::{
    ContextAttributeFlags, ContextAttributes, ContextManager, GLVersion, SurfaceTypeFlags,
};
use crate::coordinator::SurfaceCoordinator;
use crate::damage::{
    DamageHistory, DamageRect, ExistingDamage, DAMAGE_HISTORY_DEPTH, EXISTING_DAMAGE_SLOTS,
};
use crate::egl;
use crate::egl::types::{EGLContext, EGLSurface, EGLint};
use crate::error::Error;
use crate::platform::egl::context::config_attributes;
use crate::platform::egl::ffi::DamageFunctions;
use crate::platform::{NativeDrawable, NativeWindow};
use crate::surface::RenderSurface;

use euclid::default::Size2D;
use std::os::raw::c_void;

fn rect(left: i32, top: i32, right: i32, bottom: i32) -> DamageRect {
    DamageRect::new(left, top, right, bottom)
}

#[test]
fn test_damage_history_bound() {
    let mut history = DamageHistory::new();
    for index in 0..25 {
        history.push(rect(index, index, index + 1, index + 1));
    }

    assert_eq!(history.len(), DAMAGE_HISTORY_DEPTH);
    for (offset, entry) in history.entries().enumerate() {
        let index = 15 + offset as i32;
        assert_eq!(*entry, rect(index, index, index + 1, index + 1));
    }
}

#[test]
fn test_existing_damage_for_low_age() {
    let mut history = DamageHistory::new();
    history.push(rect(1, 2, 3, 4));

    let full = DamageRect::of_size(800, 600);
    assert_eq!(history.existing_damage_for_age(0, full), full);
    assert_eq!(history.existing_damage_for_age(1, full), full);
}

#[test]
fn test_existing_damage_unions_recent_entries() {
    let mut history = DamageHistory::new();
    history.push(rect(0, 0, 10, 10)); // too old for a buffer of age 4
    history.push(rect(100, 100, 150, 150));
    history.push(rect(20, 30, 40, 50));
    history.push(rect(10, 200, 30, 220));

    let full = DamageRect::of_size(800, 600);
    assert_eq!(
        history.existing_damage_for_age(4, full),
        rect(10, 30, 150, 220)
    );
}

#[test]
fn test_existing_damage_with_short_history() {
    let mut history = DamageHistory::new();
    history.push(rect(0, 0, 10, 10));
    history.push(rect(30, 30, 40, 40));

    // The walk stops at the recorded frames rather than widening to the full surface.
    let full = DamageRect::of_size(800, 600);
    assert_eq!(history.existing_damage_for_age(10, full), rect(0, 0, 40, 40));
}

#[test]
fn test_existing_damage_with_empty_history() {
    let history = DamageHistory::new();
    let full = DamageRect::of_size(800, 600);
    assert_eq!(history.existing_damage_for_age(5, full), full);
}

#[test]
fn test_first_partial_frame_reports_only_itself() {
    // An 800×600 surface presents one partial frame; a buffer of age 2 missed exactly that
    // frame and nothing else.
    let mut history = DamageHistory::new();
    history.push(rect(10, 10, 50, 50));

    let full = DamageRect::of_size(800, 600);
    assert_eq!(history.existing_damage_for_age(2, full), rect(10, 10, 50, 50));
}

#[test]
fn test_native_rect_round_trip() {
    let damage = rect(10, 20, 50, 80);
    let native = damage.to_native(600);
    assert_eq!(native, [10, 520, 40, 60]);
    assert_eq!(DamageRect::from_native(native, 600), damage);
}

#[test]
fn test_existing_damage_map_replaces_reused_ids() {
    let mut map = ExistingDamage::new();
    map.record(7, rect(0, 0, 1, 1));
    map.record(7, rect(2, 2, 3, 3));
    assert_eq!(map.get(7), Some(rect(2, 2, 3, 3)));

    // Replacement, not accumulation: every other slot is still free.
    for id in 0..(EXISTING_DAMAGE_SLOTS as u32 - 1) {
        map.record(100 + id, rect(0, 0, 1, 1));
    }
    assert_eq!(map.get(7), Some(rect(2, 2, 3, 3)));
}

#[test]
fn test_existing_damage_map_release() {
    let mut map = ExistingDamage::new();
    map.record(7, rect(0, 0, 1, 1));
    map.release(7);
    assert_eq!(map.get(7), None);
    map.release(7);
    assert_eq!(map.get(7), None);
}

#[test]
fn test_existing_damage_map_eviction() {
    let mut map = ExistingDamage::new();
    for id in 0..EXISTING_DAMAGE_SLOTS as u32 {
        map.record(id, rect(0, 0, 1, 1));
    }

    map.record(99, rect(5, 5, 6, 6));
    assert_eq!(map.get(0), None);
    assert_eq!(map.get(99), Some(rect(5, 5, 6, 6)));
    for id in 1..EXISTING_DAMAGE_SLOTS as u32 {
        assert!(map.get(id).is_some());
    }
}

#[test]
fn test_config_attribute_translation() {
    let attributes = ContextAttributes {
        version: GLVersion::new(2, 0),
        flags: ContextAttributeFlags::ALPHA | ContextAttributeFlags::STENCIL,
        surface_types: SurfaceTypeFlags::WINDOW | SurfaceTypeFlags::PBUFFER,
    };
    let (required, requested) = config_attributes(&attributes);

    assert_eq!(attribute_value(&required, egl::ALPHA_SIZE as EGLint), Some(8));
    assert_eq!(attribute_value(&requested, egl::DEPTH_SIZE as EGLint), Some(0));
    assert_eq!(
        attribute_value(&requested, egl::STENCIL_SIZE as EGLint),
        Some(8)
    );
    assert_eq!(
        attribute_value(&requested, egl::SURFACE_TYPE as EGLint),
        Some((egl::WINDOW_BIT | egl::PBUFFER_BIT) as EGLint)
    );
    assert_eq!(
        attribute_value(&requested, egl::RENDERABLE_TYPE as EGLint),
        Some(egl::OPENGL_ES2_BIT as EGLint)
    );
}

fn attribute_value(list: &[EGLint], attribute: EGLint) -> Option<EGLint> {
    list.chunks(2)
        .find(|pair| pair.len() == 2 && pair[0] == attribute)
        .map(|pair| pair[1])
}

struct FakeWindow {
    resize_ok: bool,
    needs_recreation: bool,
}

impl NativeWindow for FakeWindow {
    fn native_drawable(&self) -> NativeDrawable {
        NativeDrawable::Window(0x1 as *mut c_void)
    }

    fn resize(&mut self, _: Size2D<i32>) -> bool {
        self.resize_ok
    }

    fn needs_surface_recreation_after_resize(&self) -> bool {
        self.needs_recreation
    }
}

fn fake_surface(surface: usize, context: usize, size: Size2D<i32>) -> RenderSurface {
    RenderSurface::new(
        egl::NO_DISPLAY,
        surface as EGLSurface,
        false,
        context as EGLContext,
        size,
        false,
        DamageFunctions::none(),
    )
}

#[test]
fn test_resize_in_place_preserves_surfaces() {
    let manager = ContextManager::stub();
    let window = FakeWindow {
        resize_ok: true,
        needs_recreation: false,
    };
    let mut coordinator = SurfaceCoordinator::new(Box::new(window), true);
    coordinator.onscreen = Some(fake_surface(0x10, 0x20, Size2D::new(800, 600)));
    coordinator.offscreen = Some(fake_surface(0x30, 0x40, Size2D::new(1, 1)));

    coordinator.resize(&manager, Size2D::new(1024, 768)).unwrap();

    let onscreen = coordinator.onscreen_surface().unwrap();
    assert_eq!(onscreen.egl_surface as usize, 0x10);
    assert_eq!(onscreen.size(), Size2D::new(1024, 768));
    let offscreen = coordinator.offscreen_surface().unwrap();
    assert_eq!(offscreen.egl_surface as usize, 0x30);
    assert_eq!(offscreen.size(), Size2D::new(1, 1));
}

#[test]
fn test_resize_failure_leaves_surfaces_alone() {
    let manager = ContextManager::stub();
    let window = FakeWindow {
        resize_ok: false,
        needs_recreation: false,
    };
    let mut coordinator = SurfaceCoordinator::new(Box::new(window), true);
    coordinator.onscreen = Some(fake_surface(0x10, 0x20, Size2D::new(800, 600)));

    match coordinator.resize(&manager, Size2D::new(1024, 768)) {
        Err(Error::ResizeFailed) => {}
        _ => panic!(),
    }
    let onscreen = coordinator.onscreen_surface().unwrap();
    assert_eq!(onscreen.egl_surface as usize, 0x10);
    assert_eq!(onscreen.size(), Size2D::new(800, 600));
}

#[test]
fn test_destroy_onscreen_is_idempotent() {
    let window = FakeWindow {
        resize_ok: true,
        needs_recreation: false,
    };
    let mut coordinator = SurfaceCoordinator::new(Box::new(window), true);
    coordinator.destroy_onscreen();
    coordinator.destroy_onscreen();
    assert!(coordinator.onscreen_surface().is_none());
}

#[test]
fn test_callbacks_without_surfaces() {
    let window = FakeWindow {
        resize_ok: true,
        needs_recreation: false,
    };
    let mut coordinator = SurfaceCoordinator::new(Box::new(window), true);

    assert!(!coordinator.make_current());
    assert!(!coordinator.make_resource_current());
    assert!(!coordinator.present(0));
    assert!(coordinator.clear_current());
    assert_eq!(coordinator.framebuffer_id(), 0);
    assert_eq!(
        coordinator.populate_existing_damage(0),
        DamageRect::of_size(0, 0)
    );
}

#[test]
fn test_surface_validity() {
    let mut surface = fake_surface(0x10, 0x20, Size2D::new(800, 600));
    assert!(surface.is_valid());
    surface.destroy();
    assert!(!surface.is_valid());

    let mut no_context = fake_surface(0x10, 0, Size2D::new(800, 600));
    assert!(!no_context.is_valid());
    no_context.destroy();
}
