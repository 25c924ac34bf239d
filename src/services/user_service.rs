//! 用户服务：注册、资料修改、注销

use crate::{
    auth::password::PasswordHasher,
    error::AppError,
    models::user::{
        NewUser, SignUpRequest, SignUpResponse, UpdateUserRequest, UpdateUserResponse, UserRole,
    },
    repository::{with_timeout, UserStore},
    services::CredentialValidator,
};
use std::{sync::Arc, time::Duration};

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: Arc<CredentialValidator>,
    store_timeout: Duration,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        validator: Arc<CredentialValidator>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            validator,
            store_timeout,
        }
    }

    /// 注册新用户，默认角色为 USER
    pub async fn sign_up(&self, req: SignUpRequest) -> Result<SignUpResponse, AppError> {
        self.validator.check_duplicate(&req.username).await?;

        let password_hash = self.hasher.hash_blocking(req.password).await?;
        let user = with_timeout(
            self.store_timeout,
            self.store.insert(NewUser {
                username: req.username,
                password_hash,
                role: UserRole::User,
                nickname: req.nickname,
            }),
        )
        .await?;

        tracing::info!(username = %user.username, user_id = user.id, "User registered");
        Ok(SignUpResponse::from(&user))
    }

    /// 修改昵称与密码，需要验证原密码
    pub async fn update_user(
        &self,
        username: &str,
        req: UpdateUserRequest,
    ) -> Result<UpdateUserResponse, AppError> {
        self.validator.authenticate(username, &req.ori_password).await?;

        let password_hash = self.hasher.hash_blocking(req.new_password).await?;
        let user = with_timeout(
            self.store_timeout,
            self.store.update_profile(username, &req.nickname, &password_hash),
        )
        .await?
        .ok_or(AppError::IdentityNotFound)?;

        tracing::info!(username = %user.username, "User profile updated");
        Ok(UpdateUserResponse::from(&user))
    }

    /// 注销账户，需要验证密码
    pub async fn delete_user(&self, username: &str, password: &str) -> Result<(), AppError> {
        self.validator.authenticate(username, password).await?;

        let removed = with_timeout(self.store_timeout, self.store.delete(username)).await?;
        if !removed {
            return Err(AppError::IdentityNotFound);
        }

        tracing::info!(username = %username, "User deleted");
        Ok(())
    }
}
