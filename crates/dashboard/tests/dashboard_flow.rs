//! End-to-end controller scenarios driven through decoded Socket.IO frames

use syncify_dashboard::{Dashboard, EditForm, NoticeDurations, RecordingChannel, Refresh};
use syncify_protocol::{
    ClientEvent, EnginePacket, LastSynced, Playlist, ServerEvent, SocketPacket,
};

fn dashboard() -> Dashboard<RecordingChannel> {
    Dashboard::new(RecordingChannel::new(), NoticeDurations::default())
}

/// Decode a raw WebSocket frame the way the page does
fn server_frame(dash: &mut Dashboard<RecordingChannel>, frame: &str) -> Refresh {
    let EnginePacket::Message(payload) = EnginePacket::decode(frame).unwrap() else {
        panic!("expected message frame");
    };
    let SocketPacket::Event { name, args, .. } = SocketPacket::decode(&payload).unwrap() else {
        panic!("expected event packet");
    };
    dash.handle_event(ServerEvent::from_event(&name, args).unwrap())
}

const FOO_UPDATE: &str = r#"42["Update",{"sync_list":[{"ID":"9b0e","Name":"Foo","Link":"https://open.spotify.com/playlist/abc","Sleep":10,"Last_Synced":"02-01-24 03:00:12","Song_Count":41}]}]"#;

#[test]
fn add_after_server_push() {
    let mut dash = dashboard();
    assert_eq!(server_frame(&mut dash, FOO_UPDATE), Refresh::Playlists);
    assert_eq!(dash.len(), 1);
    assert_eq!(dash.playlists()[0].name, "Foo");

    let id = dash.add_playlist();
    assert_eq!(dash.len(), 2);
    let added = &dash.playlists()[1];
    assert_eq!(added.id, id);
    assert_ne!(added.id, dash.playlists()[0].id);
    assert_eq!(added.name, "New Playlist");
    assert_eq!(added.sleep, 0);
    assert_eq!(added.song_count, 0);
    assert_eq!(added.last_synced, LastSynced::Never);

    // Adding is local until the bulk save
    assert!(dash.channel().is_empty());
}

#[test]
fn update_discards_unsaved_edits() {
    let mut dash = dashboard();
    server_frame(&mut dash, FOO_UPDATE);
    dash.add_playlist();
    dash.remove_at(0).unwrap();
    assert_eq!(dash.playlists()[0].name, "New Playlist");

    server_frame(&mut dash, FOO_UPDATE);
    assert_eq!(dash.len(), 1);
    assert_eq!(dash.playlists()[0].name, "Foo");
    assert_eq!(dash.playlists()[0].song_count, 41);
}

#[test]
fn edit_then_save_survives_removal_before_it() {
    let mut dash = dashboard();
    server_frame(
        &mut dash,
        r#"42["Update",{"sync_list":[{"ID":"a","Name":"One"},{"ID":"b","Name":"Two"},{"ID":"c","Name":"Three"}]}]"#,
    );

    // The dialog for "Three" was built at position 2
    let dialog = dash.edit_dialogs()[2].clone();
    assert_eq!(dialog.name, "Three");

    dash.remove_at(0).unwrap();
    let dialogs = dash.edit_dialogs();
    assert_eq!(dialogs[1].id, dialog.id);
    assert_eq!(dialogs[1].position, 1);
    assert_eq!(dialogs[1].ids, dialog.ids);

    dash.save_playlist(
        &dialog.id,
        &EditForm {
            name: "Three (edited)".into(),
            link: String::new(),
            sleep: String::new(),
        },
    )
    .unwrap();

    let events = dash.channel().take();
    let [ClientEvent::SavePlaylistSettings(save)] = events.as_slice() else {
        panic!("expected one save_playlist_settings");
    };
    assert_eq!(save.playlist.id, dialog.id);
    assert_eq!(save.playlist.name, "Three (edited)");
    assert_eq!(save.playlist.sleep, 0);
    assert_eq!(dash.playlists()[0].name, "Two");
}

#[test]
fn outbound_frames_match_backend_contract() {
    let mut dash = dashboard();
    dash.apply_update(syncify_protocol::SyncListUpdate {
        sync_list: vec![Playlist::placeholder("x".into())],
    });
    dash.save_all();
    dash.open_settings();

    let frames: Vec<String> = dash
        .channel()
        .take()
        .iter()
        .map(|event| SocketPacket::event(event.name(), event.args().unwrap()).to_frame())
        .collect();

    assert_eq!(
        frames,
        vec![
            r#"42["save_playlists",{"Saved_sync_list":[{"ID":"x","Last_Synced":"Never","Link":"","Name":"New Playlist","Sleep":0,"Song_Count":0}]}]"#.to_string(),
            r#"42["loadSettings"]"#.to_string(),
        ]
    );
}

#[test]
fn settings_loaded_fills_form_once() {
    let mut dash = dashboard();
    dash.open_settings();

    let frame = r#"42["settingsLoaded",{"sync_start_times":[0,6],"media_server_addresses":"http://plex:32400","media_server_tokens":"tok","media_server_library_name":"Music","spotify_client_id":"cid","spotify_client_secret":"sec"}]"#;
    let Refresh::SettingsForm(form) = server_frame(&mut dash, frame) else {
        panic!("expected settings form");
    };
    assert_eq!(form.sync_start_times, "0, 6");
    assert_eq!(form.media_server_tokens, "tok");

    assert_eq!(server_frame(&mut dash, frame), Refresh::Nothing);
}
