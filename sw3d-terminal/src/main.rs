/// SW3D Terminal Demo - Phong-shaded mesh viewer
///
/// Usage: sw3d-terminal [mesh.obj] [config.yaml]
///
/// Controls:
///   - Arrow Keys: Rotate the model
///   - WASD: Move the model (the camera target follows)
///   - N/M: Dolly the camera out/in
///   - Q/ESC: Quit

use std::env;
use std::fs;
use std::io;
use sw3d_core::{obj, Mesh, RenderConfig};
use sw3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => {
            println!("Loading mesh: {}", path);
            let text = fs::read_to_string(path)
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read mesh: {}", e)))?;
            obj::parse_obj(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse mesh: {}", e)))?
        }
        None => {
            println!("No mesh provided, using default cube...");
            Mesh::cube(8.0)
        }
    };

    let config = match args.get(2) {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read config: {}", e)))?;
            RenderConfig::from_yaml(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?
        }
        None => RenderConfig::default(),
    };

    println!(
        "Loaded {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh, config)?;
    app.run()?;

    println!("Thank you for using SW3D Terminal Renderer!");
    Ok(())
}
