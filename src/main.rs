use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_freeroam::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Free Roam".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FreeRoamPlugin)
        .insert_resource(SpawnPoint {
            position: Vec3::new(0.0, 5.0, 6.0),
            yaw: 0.0,
        })
        .add_systems(Startup, spawn_world)
        .add_systems(Update, (toggle_dialog, teleport_home))
        .run();
}

/// A static piece of world geometry with a matching box collider
fn block(
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) -> impl Bundle + use<> {
    (
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(material.clone()),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        Transform::from_translation(position),
    )
}

fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground = materials.add(Color::srgb(0.35, 0.55, 0.3));
    let stone = materials.add(Color::srgb(0.6, 0.6, 0.65));
    let wood = materials.add(Color::srgb(0.55, 0.4, 0.25));
    let sign = materials.add(Color::srgb(0.9, 0.8, 0.4));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(100.0, 20.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Untagged, so solid by default
    commands.spawn(block(&mut meshes, &ground, Vec3::new(40.0, 0.2, 40.0), Vec3::new(0.0, -0.1, 0.0)));
    commands.spawn(block(&mut meshes, &stone, Vec3::new(0.4, 3.0, 20.0), Vec3::new(4.0, 1.5, 0.0)));

    // Only the root is tagged; every wall inherits it
    commands
        .spawn((
            CollisionTag::Solid,
            Transform::from_xyz(-6.0, 0.0, -4.0),
            Visibility::default(),
        ))
        .with_children(|house| {
            house.spawn(block(&mut meshes, &wood, Vec3::new(4.0, 2.5, 0.2), Vec3::new(0.0, 1.25, -2.0)));
            house.spawn(block(&mut meshes, &wood, Vec3::new(0.2, 2.5, 4.0), Vec3::new(-2.0, 1.25, 0.0)));
            house.spawn(block(&mut meshes, &wood, Vec3::new(0.2, 2.5, 4.0), Vec3::new(2.0, 1.25, 0.0)));
            // Low roof to bump your head on
            house.spawn(block(&mut meshes, &wood, Vec3::new(4.2, 0.2, 4.2), Vec3::new(0.0, 2.6, 0.0)));
        });

    // Visible but walk-through
    commands
        .spawn((
            CollisionTag::NonSolid,
            Transform::from_xyz(0.0, 0.0, 2.0),
            Visibility::default(),
        ))
        .with_children(|post| {
            post.spawn(block(&mut meshes, &wood, Vec3::new(0.1, 1.2, 0.1), Vec3::new(0.0, 0.6, 0.0)));
            post.spawn(block(&mut meshes, &sign, Vec3::new(0.8, 0.5, 0.05), Vec3::new(0.0, 1.3, 0.0)));
        });
}

/// Tab stands in for a dialog opening and closing
fn toggle_dialog(keys: Res<ButtonInput<KeyCode>>, mut disabled: ResMut<MovementDisabled>) {
    if keys.just_pressed(KeyCode::Tab) {
        disabled.0 = !disabled.0;
        info!("movement {}", if disabled.0 { "disabled" } else { "enabled" });
    }
}

fn teleport_home(
    keys: Res<ButtonInput<KeyCode>>,
    config: Query<&PlayerConfig, With<Player>>,
    mut teleports: MessageWriter<Teleport>,
) {
    if !keys.just_pressed(KeyCode::KeyT) {
        return;
    }
    let Ok(config) = config.single() else {
        return;
    };
    teleports.write(Teleport::to_feet(Vec3::new(-6.0, 0.0, -4.0), config.eye_height));
}
