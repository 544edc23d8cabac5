use embedded_graphics::prelude::*;
use image::Rgb;

use kitchenthing::dither::dither;
use kitchenthing::render::{Info, Item, Renderer};
use kitchenthing::{Color, Framebuffer, Photo, Region};

fn info() -> Info {
    Info {
        today: "Sat 17 Oct".to_string(),
        headline: Some("A couple of tasks to tick off:".to_string()),
        items: vec![Item::parse("Descale kettle|Kitchen"), Item::new("Call plumber")],
        footer: "Next update: ~12:30:00".to_string(),
    }
}

#[test]
fn one_red_pixel_covers_the_whole_panel() {
    let mut fb = Framebuffer::new(800, 480).unwrap();
    let photo = Photo::from_pixel(1, 1, Rgb([0xFFFF, 0, 0]));

    let mut region = Region::new(&mut fb);
    dither(&photo, &mut region).unwrap();

    for y in 0..480 {
        for x in 0..800 {
            assert_eq!(fb.get_pixel(x, y), Color::Red, "at ({}, {})", x, y);
        }
    }
}

#[test]
fn photo_never_overwrites_text() {
    let renderer = Renderer::default();
    let mut text_only = Framebuffer::new(800, 480).unwrap();
    let area = renderer
        .render(&mut text_only, &info(), None, &mut |_n: usize| -> Option<usize> { None })
        .unwrap();
    assert!(!area.is_zero_sized());

    let photo = Photo::from_pixel(64, 48, Rgb([0, 0, 0]));
    let mut with_photo = Framebuffer::new(800, 480).unwrap();
    let same = renderer
        .render(
            &mut with_photo,
            &info(),
            Some(&photo),
            &mut |_n: usize| -> Option<usize> { None },
        )
        .unwrap();
    assert_eq!(area, same);

    for y in 0..480u32 {
        for x in 0..800u32 {
            let p = Point::new(x as i32, y as i32);
            if area.contains(p) {
                assert_eq!(with_photo.get_pixel(x, y), Color::Black);
            } else {
                assert_eq!(
                    with_photo.get_pixel(x, y),
                    text_only.get_pixel(x, y),
                    "text changed at ({}, {})",
                    x,
                    y
                );
            }
        }
    }
}

#[test]
fn test_render_png_shows_the_frame() {
    let mut fb = Framebuffer::new(800, 480).unwrap();
    let photo = Photo::from_pixel(10, 10, Rgb([0xFFFF, 0, 0]));
    Renderer::default()
        .render(&mut fb, &info(), Some(&photo), &mut |_n: usize| -> Option<usize> { None })
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("render.png");
    fb.to_rgb_image().save(&out).unwrap();

    let back = image::open(&out).unwrap().to_rgb8();
    assert_eq!(back.dimensions(), (800, 480));
    assert_eq!(back.get_pixel(400, 240).0, [0xFF, 0x00, 0x00]);
    assert_eq!(back.get_pixel(0, 0).0, [0xFF, 0xFF, 0xFF]);
}
