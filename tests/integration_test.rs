use apps_script_provision::logger;
use apps_script_provision::{Config, ContentUploader, CredentialManager, Provisioner, ScriptClient};

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_obtain_credential() {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 需要工作目录中有 token.json 或 credentials.json
    let credential = CredentialManager::new(&config)
        .obtain()
        .await
        .expect("获取凭据失败");

    assert!(!credential.token.is_empty(), "访问令牌不应为空");
}

#[tokio::test]
#[ignore]
async fn test_create_and_upload_single_project() {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    let credential = CredentialManager::new(&config)
        .obtain()
        .await
        .expect("获取凭据失败");
    let client =
        ScriptClient::build("script", "v1", &credential, &config).expect("构建客户端失败");

    // 注意：请根据实际情况替换为自己可写的表格ID
    let parents = vec!["1XgAlL-HaBQ9h5xAaU6E1Tomu_6BqzRj6Pi6XkrQgQvo".to_string()];

    let provisioner = Provisioner::new(&client, &config.project_title);
    let outcomes = provisioner.create_all(&parents).await.expect("批量创建失败");

    assert_eq!(outcomes.len(), 1, "每个父表格应有且只有一个结果");

    let script_id = outcomes[0]
        .outcome
        .script_id()
        .expect("工程创建应该成功")
        .to_string();

    // 上传两个固定文件并校验整体替换语义
    let uploader = ContentUploader::new(&client);
    let content = uploader
        .upload(&script_id, apps_script_provision::project_files())
        .await
        .expect("上传内容失败");

    assert_eq!(content.script_id, script_id);
    assert_eq!(content.files.len(), 2, "工程应恰好包含上传的两个文件");

    // 重复上传相同内容应幂等
    let again = uploader
        .upload(&script_id, apps_script_provision::project_files())
        .await
        .expect("重复上传失败");
    assert_eq!(again.files.len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_batch_mixed_valid_invalid_parents() {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    let credential = CredentialManager::new(&config)
        .obtain()
        .await
        .expect("获取凭据失败");
    let client =
        ScriptClient::build("script", "v1", &credential, &config).expect("构建客户端失败");

    // 两个有效ID加一个无效ID，顺序和数量都必须保持
    let parents = vec![
        "1XgAlL-HaBQ9h5xAaU6E1Tomu_6BqzRj6Pi6XkrQgQvo".to_string(),
        "1jwO2WAg5nFIiGv1WHD1JsQLkPDVdguBVhR8khlnwfB8".to_string(),
        "definitely-not-a-spreadsheet-id".to_string(),
    ];

    let provisioner = Provisioner::new(&client, &config.project_title);
    let outcomes = provisioner.create_all(&parents).await.expect("批量创建失败");

    assert_eq!(outcomes.len(), 3, "结果数量必须与输入一致");
    assert_eq!(outcomes[2].parent_id, "definitely-not-a-spreadsheet-id");
    assert!(
        outcomes[2].outcome.script_id().is_none(),
        "无效父表格应失败且不影响其余各项"
    );
}
