//! 2D visualization.
//!
//! The draw commands of the last tick are replayed through gizmos every frame. The picture of
//! the first robot carrying a camera is shown next to the world.

use bevy::{
    math::Affine2,
    prelude::*,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat},
        texture::ImageSampler,
    },
};

use jyro_sim::domain::{self, DrawCommand, Picture};

use crate::resource::{DrawListRes, SimulationRes};

/// Screen pixels per world unit.
const SCALE: f32 = 1.5;
/// Top left corner of the world on screen.
const WORLD_ORIGIN: Vec2 = Vec2::new(-620.0, 320.0);
/// Gap between the world and the camera picture.
const MARGIN: f32 = 20.0;
const ARC_SEGMENTS: usize = 16;

pub struct Visualizer;

impl Plugin for Visualizer {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, set_up)
            .add_systems(
                Update,
                (draw_world, update_picture, update_text, handle_keyboard_input),
            )
            .init_resource::<Panel>();
    }
}

#[derive(Resource)]
pub struct Panel {
    picture: Option<Handle<Image>>,
    show_text: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            picture: None,
            show_text: true,
        }
    }
}

fn set_up(
    mut panel: ResMut<Panel>,
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    simulation: Res<SimulationRes>,
) {
    commands.spawn(Camera2dBundle::default());
    let world = simulation.world();
    let picture = world
        .robots()
        .iter()
        .find_map(|robot| robot.cameras().first())
        .map(|camera| camera.take_picture());
    if let Some(picture) = picture {
        let offset = Vec2::new(world.width() as f32 * SCALE + MARGIN, 0.0);
        panel.picture = Some(create_picture(
            picture,
            WORLD_ORIGIN + offset,
            &mut commands,
            &mut images,
        ));
    }
    create_text(&mut commands);
}

fn create_picture(
    picture: Picture,
    corner: Vec2,
    commands: &mut Commands,
    images: &mut ResMut<Assets<Image>>,
) -> Handle<Image> {
    let size = Vec2::new(picture.width() as f32, picture.height() as f32) * SCALE;
    let mut image = Image::new(
        Extent3d {
            width: picture.width() as u32,
            height: picture.height() as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        picture.into_bytes(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::nearest();
    let handle = images.add(image);

    commands.spawn(SpriteBundle {
        texture: handle.clone(),
        sprite: Sprite {
            custom_size: Some(size),
            ..default()
        },
        transform: Transform::from_translation(
            (corner + Vec2::new(size.x, -size.y) / 2.0).extend(0.0),
        ),
        ..default()
    });
    handle
}

fn create_text(commands: &mut Commands) {
    let text_style = TextStyle {
        font_size: 20.0,
        ..default()
    };
    commands.spawn(
        TextBundle::from_sections(vec![TextSection::new("", text_style.clone())]).with_style(
            Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                left: Val::Px(12.0),
                ..default()
            },
        ),
    );
}

/// Current outline color and transform while replaying a draw list.
#[derive(Default)]
struct Pen {
    fill: Option<domain::Color>,
    stroke: Option<domain::Color>,
    transform: Affine2,
    stack: Vec<Affine2>,
}

impl Pen {
    /// Gizmos only draw outlines, so filled shapes are outlined in their fill color.
    fn color(&self) -> Option<Color> {
        self.stroke.or(self.fill).map(to_bevy_color)
    }

    fn position(&self, point: domain::Point) -> Vec2 {
        to_bevy_position(self.transform.transform_point2(to_vec2(point)))
    }

    fn outline(&self, gizmos: &mut Gizmos, points: impl IntoIterator<Item = domain::Point>) {
        let Some(color) = self.color() else {
            return;
        };
        let mut points = points
            .into_iter()
            .map(|p| self.position(p))
            .collect::<Vec<_>>();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        gizmos.linestrip_2d(points, color);
    }
}

fn draw_world(mut gizmos: Gizmos, draw: Res<DrawListRes>) {
    let mut pen = Pen::default();
    for command in draw.commands() {
        match command {
            DrawCommand::Clear => {}
            DrawCommand::Fill(color) => pen.fill = Some(*color),
            DrawCommand::NoFill => pen.fill = None,
            DrawCommand::Stroke { color, .. } => pen.stroke = Some(*color),
            DrawCommand::NoStroke => pen.stroke = None,
            DrawCommand::Polygon(points) => pen.outline(&mut gizmos, points.iter().copied()),
            DrawCommand::Line(p1, p2) => {
                if let Some(color) = pen.color() {
                    gizmos.line_2d(pen.position(*p1), pen.position(*p2), color);
                }
            }
            DrawCommand::Arc {
                center,
                width,
                height,
                start,
                stop,
            } => {
                let Some(color) = pen.color() else {
                    continue;
                };
                let points = (0..=ARC_SEGMENTS)
                    .map(|i| {
                        let angle = start + (stop - start) * i as f64 / ARC_SEGMENTS as f64;
                        domain::Point::new(
                            center.x() + width / 2.0 * angle.cos(),
                            center.y() + height / 2.0 * angle.sin(),
                        )
                    })
                    .map(|p| pen.position(p));
                let center = pen.position(*center);
                gizmos.linestrip_2d(
                    std::iter::once(center)
                        .chain(points)
                        .chain(std::iter::once(center)),
                    color,
                );
            }
            DrawCommand::Rect {
                corner,
                width,
                height,
            } => {
                let (x, y) = (corner.x(), corner.y());
                pen.outline(
                    &mut gizmos,
                    [(x, y), (x + width, y), (x + width, y + height), (x, y + height)]
                        .map(domain::Point::from),
                );
            }
            DrawCommand::Ellipse { center, width, .. } => {
                if let Some(color) = pen.color() {
                    let radius = pen.transform.matrix2.x_axis.length() * *width as f32 / 2.0;
                    gizmos.circle_2d(pen.position(*center), radius * SCALE, color);
                }
            }
            DrawCommand::PushMatrix => pen.stack.push(pen.transform),
            DrawCommand::PopMatrix => pen.transform = pen.stack.pop().unwrap_or_default(),
            DrawCommand::Translate(offset) => {
                pen.transform = pen.transform * Affine2::from_translation(to_vec2(*offset));
            }
            DrawCommand::Rotate(angle) => {
                pen.transform = pen.transform * Affine2::from_angle(*angle as f32);
            }
        }
    }
}

fn update_picture(
    panel: Res<Panel>,
    mut images: ResMut<Assets<Image>>,
    simulation: Res<SimulationRes>,
) {
    let Some(handle) = &panel.picture else {
        return;
    };
    let Some(image) = images.get_mut(handle) else {
        return;
    };
    let picture = simulation
        .world()
        .robots()
        .iter()
        .find_map(|robot| robot.cameras().first())
        .map(|camera| camera.take_picture());
    if let Some(picture) = picture {
        image.data = picture.into_bytes();
    }
}

fn update_text(mut text: Query<&mut Text>, panel: Res<Panel>, simulation: Res<SimulationRes>) {
    let mut text = text.single_mut();
    if !panel.show_text {
        text.sections[0].value = String::new();
        return;
    }
    let robots = simulation
        .world()
        .robots()
        .iter()
        .map(|robot| {
            let readings = robot
                .range_sensors()
                .iter()
                .map(|sensor| format!("{:4.2}", sensor.reading()))
                .collect::<Vec<_>>()
                .join(" ");
            let stalled = if robot.stalled() { "  STALLED" } else { "" };
            format!("{}: IR {readings}{stalled}", robot.name())
        })
        .collect::<Vec<_>>()
        .join("\n");
    text.sections[0].value = format!("T: {:6.1} s\n{robots}", simulation.time());
}

fn handle_keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut panel: ResMut<Panel>) {
    if keys.just_pressed(KeyCode::KeyT) {
        panel.show_text = !panel.show_text;
    }
}

fn to_vec2(point: domain::Point) -> Vec2 {
    Vec2::new(point.x() as f32, point.y() as f32)
}

/// World coordinates grow downwards, Bevy's upwards.
fn to_bevy_position(position: Vec2) -> Vec2 {
    WORLD_ORIGIN + Vec2::new(position.x, -position.y) * SCALE
}

fn to_bevy_color(color: domain::Color) -> Color {
    Color::rgba_u8(color.red, color.green, color.blue, color.alpha)
}
