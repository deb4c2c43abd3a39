use motionframe::{FrameIndex, Scene, SceneDef};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/scenes/hook.json");
    let scene = Scene::compile(&SceneDef::from_json_str(s)?)?;

    for f in [0u64, 10, 20, 30, 45, 70, 80, 89] {
        let frame = scene.sample(FrameIndex(f))?;
        println!("frame {f}: {}", serde_json::to_string(&frame.values)?);
    }
    println!("fingerprint {:016x}", scene.fingerprint(scene.full_range())?);
    Ok(())
}
