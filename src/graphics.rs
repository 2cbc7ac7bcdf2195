use macroquad::prelude::*;
use std::sync::Arc;
use tracing::info;

use courier_map::{RasterMap, WorldPoint};
use courier_motion::Pose;

use crate::blackboard::{Blackboard, RunStatus, snapshot};
use crate::bus::Topic;
use crate::sim::Command;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "Courier Simulation".to_string(),
        window_width: 800,
        window_height: 600,
        high_dpi: true,
        ..Default::default()
    }
}

pub async fn run_visualization_loop(bb: Blackboard, commands: Topic<Command>) {
    info!("Visualization loop starting inside graphics module...");
    let mut texture: Option<(u64, Texture2D)> = None;

    loop {
        handle_keys(&commands);

        let state = snapshot(&bb);
        clear_background(LIGHTGRAY);

        match &state.map {
            Some(map) => {
                let stale = texture.as_ref().is_none_or(|(epoch, _)| *epoch != state.map_epoch);
                if stale {
                    texture = Some((state.map_epoch, build_texture(map)));
                }
            }
            None => texture = None,
        }

        let scale = state
            .map
            .as_ref()
            .map_or(1.0, |m| {
                (screen_width() / m.width() as f32).min(screen_height() / m.height() as f32)
            });

        if let Some((_, tex)) = &texture {
            draw_texture_ex(
                tex,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(tex.width() * scale, tex.height() * scale)),
                    ..Default::default()
                },
            );
        }

        for pair in state.waypoints.windows(2) {
            draw_line(
                pair[0].x * scale,
                pair[0].y * scale,
                pair[1].x * scale,
                pair[1].y * scale,
                2.0,
                SKYBLUE,
            );
        }

        if let Some(markers) = &state.markers {
            draw_flag(markers.start, scale, YELLOW);
            draw_flag(markers.pickup, scale, BLUE);
            draw_flag(markers.goal, scale, RED);
        }

        if state.map.is_some() {
            draw_agent(&state.pose, scale);
        }

        draw_hud(&state.pose, state.status, &state.faults);

        next_frame().await
    }
}

fn handle_keys(commands: &Topic<Command>) {
    if is_key_pressed(KeyCode::G) {
        commands.publish(Command::GenerateMap);
    }
    if is_key_pressed(KeyCode::R) {
        commands.publish(Command::Randomize);
    }
    if is_key_pressed(KeyCode::Space) {
        commands.publish(Command::Start);
    }
    if is_key_pressed(KeyCode::S) {
        commands.publish(Command::Stop);
    }
}

fn build_texture(map: &Arc<RasterMap>) -> Texture2D {
    let tex = Texture2D::from_rgba8(map.width() as u16, map.height() as u16, map.bytes());
    tex.set_filter(FilterMode::Nearest);
    tex
}

fn draw_flag(p: WorldPoint, scale: f32, color: Color) {
    let x = p.x * scale;
    let y = p.y * scale;
    draw_line(x, y, x, y - 14.0, 2.0, DARKGRAY);
    draw_triangle(
        Vec2::new(x, y - 14.0),
        Vec2::new(x + 9.0, y - 10.5),
        Vec2::new(x, y - 7.0),
        color,
    );
}

fn draw_agent(pose: &Pose, scale: f32) {
    let agent_x = pose.x as f32 * scale;
    let agent_y = pose.y as f32 * scale;
    let agent_th = pose.theta as f32;

    let r_size = 10.0;
    let p1 = Vec2::new(
        agent_x + r_size * agent_th.cos(),
        agent_y + r_size * agent_th.sin(),
    );
    let p2 = Vec2::new(
        agent_x + r_size * (agent_th + 2.0 * std::f32::consts::PI / 3.0).cos(),
        agent_y + r_size * (agent_th + 2.0 * std::f32::consts::PI / 3.0).sin(),
    );
    let p3 = Vec2::new(
        agent_x + r_size * (agent_th - 2.0 * std::f32::consts::PI / 3.0).cos(),
        agent_y + r_size * (agent_th - 2.0 * std::f32::consts::PI / 3.0).sin(),
    );
    draw_triangle(p1, p2, p3, GREEN);
    draw_line(agent_x, agent_y, p1.x, p1.y, 2.0, DARKGREEN);
}

fn draw_hud(pose: &Pose, status: RunStatus, faults: &[String]) {
    let status_text = match status {
        RunStatus::Idle => "idle".to_string(),
        RunStatus::Planning => "planning route...".to_string(),
        RunStatus::Following { next, total } => format!("waypoint {}/{}", next + 1, total),
    };
    draw_text(
        &format!("Courier: x={:.1} y={:.1} th={:.2}  [{}]", pose.x, pose.y, pose.theta, status_text),
        10.0,
        20.0,
        20.0,
        BLACK,
    );
    draw_text(
        "[G] new map  [R] randomize  [Space] start  [S] stop",
        10.0,
        40.0,
        20.0,
        BLACK,
    );
    for (i, fault) in faults.iter().enumerate() {
        draw_text(fault, 10.0, 60.0 + 20.0 * i as f32, 20.0, RED);
    }
}
