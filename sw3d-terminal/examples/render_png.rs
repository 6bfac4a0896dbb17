/// Example: Render one frame of an OBJ mesh to a PNG file, no terminal needed
///
/// Usage: cargo run --example render_png -- path/to/mesh.obj out.png [rotate_x rotate_y]

use std::env;
use std::fs;
use std::io;
use sw3d_core::{obj, CameraState, RenderConfig, Renderer};

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <mesh.obj> <out.png> [rotate_x rotate_y]", args[0]);
        return Ok(());
    }

    let text = fs::read_to_string(&args[1])
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read mesh: {}", e)))?;
    let mesh = obj::parse_obj(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse mesh: {}", e)))?;

    let mut camera = CameraState::default();
    if let (Some(x), Some(y)) = (args.get(3), args.get(4)) {
        camera.rotation_x = x
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Bad rotate_x: {}", e)))?;
        camera.rotation_y = y
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Bad rotate_y: {}", e)))?;
    }

    let invalid = |e: sw3d_core::Error| io::Error::new(io::ErrorKind::InvalidData, e.to_string());
    let mut renderer = Renderer::new(mesh, RenderConfig::default()).map_err(invalid)?;
    let fb = renderer.render(&camera).map_err(invalid)?;

    let image = image::RgbImage::from_fn(fb.width() as u32, fb.height() as u32, |x, y| {
        let p = fb.pixel(x as i64, y as i64).unwrap_or_default();
        image::Rgb([p.r, p.g, p.b])
    });
    image
        .save(&args[2])
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to write image: {}", e)))?;

    println!("Wrote {}x{} frame to {}", fb.width(), fb.height(), args[2]);
    Ok(())
}
